//! Listing filter for the reservation table.
//!
//! The table offers a status dropdown ("all" or one status) and a free-text
//! search over guest name and room number.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Reservation, ReservationStatus};
use crate::validation::validate_search_query;

/// Narrows a reservation listing. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationFilter {
    /// `None` means all statuses.
    pub status: Option<ReservationStatus>,
    /// Case-insensitive substring of guest name or room number.
    pub query: Option<String>,
}

impl ReservationFilter {
    /// Filter on a single status.
    pub fn by_status(status: ReservationStatus) -> Self {
        ReservationFilter {
            status: Some(status),
            query: None,
        }
    }

    /// Adds a search query, trimmed and length-checked.
    pub fn with_query(mut self, query: &str) -> Result<Self, ValidationError> {
        let query = validate_search_query(query)?;
        self.query = if query.is_empty() { None } else { Some(query) };
        Ok(self)
    }

    /// Returns a copy with the query normalized (trimmed, empty dropped).
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let base = ReservationFilter {
            status: self.status,
            query: None,
        };
        match &self.query {
            Some(query) => base.with_query(query),
            None => Ok(base),
        }
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(status) = self.status {
            if reservation.status != status {
                return false;
            }
        }

        let Some(query) = self.query.as_deref() else {
            return true;
        };
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [&reservation.guest_name, &reservation.room_number]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&needle))
    }
}
