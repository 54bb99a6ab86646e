//! Embedded seed dataset.
//!
//! A fixed set of reservations covering every status, each discount kind and
//! a few service lines. Billing fields are not stored in the dataset; they
//! are derived on load like any other booking.

use chrono::{DateTime, Utc};
use frontdesk_core::{BillingDefaults, NewReservation, Reservation};
use serde::Deserialize;
use tracing::debug;

use crate::error::DbResult;

const SEED_JSON: &str = include_str!("../data/reservations.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedEntry {
    #[serde(flatten)]
    booking: NewReservation,
    created_at: DateTime<Utc>,
}

/// Parses the seed dataset into reservations with `id = 0`.
///
/// Stores assign ids in dataset order.
pub fn seed_reservations(defaults: &BillingDefaults) -> DbResult<Vec<Reservation>> {
    let entries: Vec<SeedEntry> = serde_json::from_str(SEED_JSON)?;

    let reservations = entries
        .into_iter()
        .map(|entry| Reservation::import(entry.booking, defaults, entry.created_at))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = reservations.len(), "Seed dataset parsed");
    Ok(reservations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::{Discount, ReservationStatus};

    #[test]
    fn test_seed_parses_and_bills() {
        let seed = seed_reservations(&BillingDefaults::default()).unwrap();
        assert_eq!(seed.len(), 8);

        for r in &seed {
            assert_eq!(r.id, 0);
            assert!(r.number_of_nights > 0);
            assert!(r.grand_total_cents >= 0);
            assert_eq!(r.grand_total_cents, r.total_amount_cents);
        }
    }

    #[test]
    fn test_seed_covers_every_status() {
        let seed = seed_reservations(&BillingDefaults::default()).unwrap();
        for status in ReservationStatus::ALL {
            assert!(seed.iter().any(|r| r.status == status), "missing {status}");
        }
    }

    #[test]
    fn test_seed_first_entry_totals() {
        let seed = seed_reservations(&BillingDefaults::default()).unwrap();
        let first = &seed[0];
        // 3 nights × 120.00 + 6 × 15.00 breakfast = 450.00
        // tax 5% = 22.50, service 10% of 472.50 = 47.25
        assert_eq!(first.reservation_id, "RES-2025-0001");
        assert_eq!(first.base_amount_cents, 36_000);
        assert_eq!(first.tax_amount_cents, 2_250);
        assert_eq!(first.service_charge_amount_cents, 4_725);
        assert_eq!(first.grand_total_cents, 51_975);
        assert_eq!(first.discount, Discount::None);
    }

    #[test]
    fn test_seed_honours_explicit_zero_tax() {
        let seed = seed_reservations(&BillingDefaults::default()).unwrap();
        let no_show = seed
            .iter()
            .find(|r| r.status == ReservationStatus::NoShow)
            .unwrap();
        assert_eq!(no_show.tax_rate_bps, 0);
        assert_eq!(no_show.tax_amount_cents, 0);
    }
}
