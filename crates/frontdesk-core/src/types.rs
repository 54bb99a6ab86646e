//! # Domain Types
//!
//! Core domain types used throughout the front desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │     Reservation      │   │ReservationStatus│   │  PaymentStatus  │  │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │  │
//! │  │  id (store-assigned) │   │  Pending        │   │  Pending        │  │
//! │  │  reservation_id      │   │  Confirmed      │   │  Paid           │  │
//! │  │  guest_id / room_id  │   │  Cancelled      │   │  Partial        │  │
//! │  │  stay dates          │   │  NoShow         │   │  Unpaid         │  │
//! │  │  billing fields      │   │  CheckedIn      │   │  Failed         │  │
//! │  └──────────────────────┘   │  CheckedOut     │   └─────────────────┘  │
//! │                             └─────────────────┘                        │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Rate       │   │    Discount     │   │  ServiceLineItem    │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  bps (u32)      │   │  None           │   │  service_name       │   │
//! │  │  500 = 5%       │   │  Percentage     │   │  quantity × price   │   │
//! │  └─────────────────┘   │  Fixed          │   └─────────────────────┘   │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every reservation has:
//! - `id`: integer assigned by the store, immutable, used for lookups
//! - `reservation_id`: human-readable business number (`RES-2025-0042`)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// Used for tax, service charge and percentage discounts.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (default tax), 1000 bps = 10% (default service charge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Reservation Status
// =============================================================================

/// Where a reservation is in its lifecycle.
///
/// ## Front-desk Flow
/// ```text
/// Pending ──► Confirmed ──► CheckedIn ──► CheckedOut
///    │            │
///    └────────────┴──► Cancelled / NoShow
/// ```
/// Only `Confirmed → CheckedIn` and `CheckedIn → CheckedOut` are guarded
/// actions; the edit form may set any status directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Booked, awaiting confirmation.
    Pending,
    /// Confirmed, guest expected.
    Confirmed,
    /// Cancelled before arrival.
    Cancelled,
    /// Guest never arrived.
    NoShow,
    /// Guest is in the room.
    CheckedIn,
    /// Guest has left.
    CheckedOut,
}

impl ReservationStatus {
    /// Every status, in the order the edit form lists them.
    pub const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Confirmed,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
        ReservationStatus::NoShow,
        ReservationStatus::CheckedIn,
        ReservationStatus::CheckedOut,
    ];

    /// Wire name of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "noshow",
            ReservationStatus::CheckedIn => "checkedin",
            ReservationStatus::CheckedOut => "checkedout",
        }
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Partial,
    Unpaid,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Discount
// =============================================================================

/// How a reduction is computed on the folio.
///
/// ## Wire Shape
/// ```text
/// { "type": "none" }
/// { "type": "percentage", "rate": 1000, "reason": "Loyalty" }
/// { "type": "fixed", "amount": 5000, "reason": "Late check-in" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Discount {
    /// No discount.
    None,
    /// Percentage of the tax- and service-charge-inclusive subtotal.
    Percentage { rate: Rate, reason: String },
    /// Absolute amount off the folio.
    Fixed { amount: Money, reason: String },
}

impl Discount {
    /// Free-text reason, empty for `None`.
    pub fn reason(&self) -> &str {
        match self {
            Discount::None => "",
            Discount::Percentage { reason, .. } | Discount::Fixed { reason, .. } => reason,
        }
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::None
    }
}

// =============================================================================
// Additional Services
// =============================================================================

/// An ancillary service billed on the reservation (breakfast, parking, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLineItem {
    pub service_name: String,
    /// Units consumed, 1..=999.
    pub quantity: i64,
    /// Unit price in cents.
    pub price_per_unit_cents: i64,
    /// quantity × price_per_unit. Recomputed on every billing pass.
    #[serde(default)]
    pub total_cents: i64,
}

impl ServiceLineItem {
    /// Creates a line item with its total filled in.
    pub fn new(service_name: impl Into<String>, quantity: i64, price_per_unit_cents: i64) -> Self {
        ServiceLineItem {
            service_name: service_name.into(),
            quantity,
            price_per_unit_cents,
            total_cents: price_per_unit_cents.saturating_mul(quantity),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price_per_unit(&self) -> Money {
        Money::from_cents(self.price_per_unit_cents)
    }

    /// Computes quantity × unit price (ignores the stored total).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_per_unit().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// A guest's booking of a room for a date range.
///
/// Monetary fields are stored in cents and exposed as [`Money`] through
/// accessors. They are derived by the billing calculator and are never
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Store-assigned identity.
    pub id: i64,

    /// Business number, `RES-<year>-<NNNN>`.
    pub reservation_id: String,

    /// Weak reference to the guest record.
    pub guest_id: i64,

    /// Weak reference to the room record.
    pub room_id: i64,

    /// Guest display name at booking time (frozen).
    pub guest_name: Option<String>,

    /// Room number at booking time (frozen).
    pub room_number: Option<String>,

    #[ts(as = "String")]
    pub check_in_date: NaiveDate,

    #[ts(as = "String")]
    pub check_out_date: NaiveDate,

    pub adults: u32,
    pub children: u32,

    /// Derived from the stay dates.
    pub number_of_nights: i64,

    /// Room rate at booking time (frozen), in cents.
    pub price_per_night_cents: i64,

    /// Tax percentage in basis points.
    pub tax_rate_bps: u32,

    /// Service charge percentage in basis points.
    pub service_charge_rate_bps: u32,

    pub discount: Discount,

    pub additional_services: Vec<ServiceLineItem>,

    pub base_amount_cents: i64,
    pub tax_amount_cents: i64,
    pub service_charge_amount_cents: i64,
    pub discount_amount_cents: i64,
    pub grand_total_cents: i64,
    /// Mirrors `grand_total_cents`; kept for callers that read the legacy name.
    pub total_amount_cents: i64,

    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,

    pub notes: Option<String>,
    pub special_requests: Option<String>,
    pub contact: Option<String>,

    /// Set at creation, immutable.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns the room rate as Money.
    #[inline]
    pub fn price_per_night(&self) -> Money {
        Money::from_cents(self.price_per_night_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    /// Returns the service charge rate.
    #[inline]
    pub fn service_charge_rate(&self) -> Rate {
        Rate::from_bps(self.service_charge_rate_bps)
    }

    #[inline]
    pub fn base_amount(&self) -> Money {
        Money::from_cents(self.base_amount_cents)
    }

    #[inline]
    pub fn tax_amount(&self) -> Money {
        Money::from_cents(self.tax_amount_cents)
    }

    #[inline]
    pub fn service_charge_amount(&self) -> Money {
        Money::from_cents(self.service_charge_amount_cents)
    }

    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_amount_cents)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }
}

// =============================================================================
// Create / Update Requests
// =============================================================================

fn default_adults() -> u32 {
    1
}

/// Data the new-reservation form submits.
///
/// Derived fields (nights, billing amounts) are not accepted here; the
/// store computes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    /// Business number; generated when absent.
    #[serde(default)]
    pub reservation_id: Option<String>,
    pub guest_id: i64,
    pub room_id: i64,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[ts(as = "String")]
    pub check_in_date: NaiveDate,
    #[ts(as = "String")]
    pub check_out_date: NaiveDate,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    /// Room rate in cents, looked up from the selected room.
    pub price_per_night_cents: i64,
    /// Falls back to the configured default (5%) when absent.
    #[serde(default)]
    pub tax_rate_bps: Option<u32>,
    /// Falls back to the configured default (10%) when absent.
    #[serde(default)]
    pub service_charge_rate_bps: Option<u32>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub additional_services: Vec<ServiceLineItem>,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

impl NewReservation {
    /// Minimal request for a stay; everything else takes its default.
    pub fn new(
        guest_id: i64,
        room_id: i64,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        price_per_night: Money,
    ) -> Self {
        NewReservation {
            reservation_id: None,
            guest_id,
            room_id,
            guest_name: None,
            room_number: None,
            check_in_date,
            check_out_date,
            adults: default_adults(),
            children: 0,
            price_per_night_cents: price_per_night.cents(),
            tax_rate_bps: None,
            service_charge_rate_bps: None,
            discount: Discount::None,
            additional_services: Vec::new(),
            status: ReservationStatus::default(),
            payment_status: PaymentStatus::default(),
            notes: None,
            special_requests: None,
            contact: None,
        }
    }
}

/// Reads a field that is present in the input, so `null` becomes
/// `Some(None)` (clear) while an absent field stays `None` (untouched).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Partial update from the edit modal. `None` leaves a field untouched.
///
/// Optional text fields use `Some(None)` to clear a value; on the wire that
/// is an explicit `null`:
/// ```text
/// { "notes": null }        → notes cleared
/// { }                      → notes untouched
/// { "notes": "Late" }      → notes set
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationPatch {
    pub guest_id: Option<i64>,
    pub room_id: Option<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub room_number: Option<Option<String>>,
    #[ts(as = "Option<String>")]
    pub check_in_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub check_out_date: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub price_per_night_cents: Option<i64>,
    pub tax_rate_bps: Option<u32>,
    pub service_charge_rate_bps: Option<u32>,
    pub discount: Option<Discount>,
    pub additional_services: Option<Vec<ServiceLineItem>>,
    pub status: Option<ReservationStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub contact: Option<Option<String>>,
}

impl ReservationPatch {
    /// True when the patch changes an input of the billing calculator.
    pub fn touches_billing(&self) -> bool {
        self.check_in_date.is_some()
            || self.check_out_date.is_some()
            || self.price_per_night_cents.is_some()
            || self.tax_rate_bps.is_some()
            || self.service_charge_rate_bps.is_some()
            || self.discount.is_some()
            || self.additional_services.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
        assert_eq!(rate.to_string(), "8.25%");
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(ReservationStatus::default(), ReservationStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ReservationStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checkedin\"");
        let status: ReservationStatus = serde_json::from_str("\"noshow\"").unwrap();
        assert_eq!(status, ReservationStatus::NoShow);
        for status in ReservationStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_discount_wire_shape() {
        let discount: Discount =
            serde_json::from_str(r#"{"type":"percentage","rate":1000,"reason":"Loyalty"}"#)
                .unwrap();
        assert_eq!(
            discount,
            Discount::Percentage {
                rate: Rate::from_bps(1000),
                reason: "Loyalty".to_string()
            }
        );
        assert_eq!(discount.reason(), "Loyalty");

        let none: Discount = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, Discount::None);
        assert_eq!(none.reason(), "");
    }

    #[test]
    fn test_service_line_total() {
        let item = ServiceLineItem::new("Breakfast", 2, 1_500);
        assert_eq!(item.total_cents, 3_000);
        assert_eq!(item.line_total().cents(), 3_000);
    }

    #[test]
    fn test_new_reservation_json_defaults() {
        let json = r#"{
            "guestId": 3,
            "roomId": 12,
            "checkInDate": "2030-05-01",
            "checkOutDate": "2030-05-03",
            "pricePerNightCents": 10000
        }"#;
        let new: NewReservation = serde_json::from_str(json).unwrap();
        assert_eq!(new.adults, 1);
        assert_eq!(new.children, 0);
        assert_eq!(new.discount, Discount::None);
        assert_eq!(new.tax_rate_bps, None);
        assert_eq!(new.status, ReservationStatus::Pending);
    }

    #[test]
    fn test_patch_json_null_clears_and_absent_keeps() {
        let patch: ReservationPatch =
            serde_json::from_str(r#"{"notes": null, "contact": "+1 555 0100"}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.contact, Some(Some("+1 555 0100".to_string())));
        assert_eq!(patch.guest_name, None);
        assert_eq!(patch.room_number, None);
        assert_eq!(patch.special_requests, None);

        let patch: ReservationPatch =
            serde_json::from_str(r#"{"guestName": null, "roomNumber": null, "specialRequests": null}"#)
                .unwrap();
        assert_eq!(patch.guest_name, Some(None));
        assert_eq!(patch.room_number, Some(None));
        assert_eq!(patch.special_requests, Some(None));
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn test_patch_json_keeps_clear_distinct_from_untouched() {
        let clear = ReservationPatch {
            notes: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&clear).unwrap();
        let back: ReservationPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back.notes, Some(None));

        let json = serde_json::to_string(&ReservationPatch::default()).unwrap();
        let back: ReservationPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back.notes, None);
    }

    #[test]
    fn test_patch_touches_billing() {
        let patch = ReservationPatch {
            notes: Some(Some("Late arrival".to_string())),
            status: Some(ReservationStatus::Confirmed),
            ..Default::default()
        };
        assert!(!patch.touches_billing());

        let patch = ReservationPatch {
            discount: Some(Discount::None),
            ..Default::default()
        };
        assert!(patch.touches_billing());
    }
}
