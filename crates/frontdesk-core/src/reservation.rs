//! # Reservation Lifecycle
//!
//! Turns requests into reservations and keeps their derived fields honest.
//!
//! ## Flow
//! ```text
//! NewReservation ──► validate ──► draft() ──► store assigns id
//!                                    │
//!                                    └── nights + billing derived here
//!
//! ReservationPatch ──► validate ──► apply_patch() ──► recompute billing
//!                                                     (only when a billing
//!                                                      input changed)
//! ```
//!
//! The room rate is copied onto the reservation at booking time, so later
//! room price changes never alter an existing folio.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::billing::{calculate, nights_between, BillingBreakdown, BillingDefaults, BillingInput};
use crate::error::{CoreError, CoreResult};
use crate::types::{NewReservation, Reservation, ReservationPatch, ReservationStatus};
use crate::validation::{
    validate_booking, validate_new_reservation, validate_patch, validate_stay_dates,
};

/// Generates a business reservation number, `RES-<year>-<NNNN>`.
///
/// The suffix is random and only needs to be readable, not unique; the
/// store-assigned `id` is the identity.
///
/// ## Example
/// ```rust
/// use frontdesk_core::reservation::generate_reservation_id;
///
/// let id = generate_reservation_id(2030);
/// assert!(id.starts_with("RES-2030-"));
/// assert_eq!(id.len(), "RES-2030-0000".len());
/// ```
pub fn generate_reservation_id(year: i32) -> String {
    let suffix = Uuid::new_v4().as_u128() % 10_000;
    format!("RES-{}-{:04}", year, suffix)
}

impl Reservation {
    /// Builds a reservation from a create request.
    ///
    /// The returned value has `id = 0`; the store assigns the real id.
    /// Rates missing from the request are taken from `defaults`.
    pub fn draft(
        new: NewReservation,
        defaults: &BillingDefaults,
        now: DateTime<Utc>,
    ) -> CoreResult<Reservation> {
        validate_new_reservation(&new, now.date_naive())?;
        Ok(Self::assemble(new, defaults, now))
    }

    /// Builds a reservation for a stay that may already be in the past
    /// (seed data, imports). All other booking rules still apply.
    pub fn import(
        new: NewReservation,
        defaults: &BillingDefaults,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Reservation> {
        validate_booking(&new)?;
        Ok(Self::assemble(new, defaults, created_at))
    }

    fn assemble(new: NewReservation, defaults: &BillingDefaults, now: DateTime<Utc>) -> Reservation {
        let reservation_id = match new.reservation_id {
            Some(id) => id.trim().to_string(),
            None => generate_reservation_id(now.year()),
        };

        let mut reservation = Reservation {
            id: 0,
            reservation_id,
            guest_id: new.guest_id,
            room_id: new.room_id,
            guest_name: new.guest_name,
            room_number: new.room_number,
            check_in_date: new.check_in_date,
            check_out_date: new.check_out_date,
            adults: new.adults,
            children: new.children,
            number_of_nights: 0,
            price_per_night_cents: new.price_per_night_cents,
            tax_rate_bps: defaults.tax_rate_or_default(new.tax_rate_bps).bps(),
            service_charge_rate_bps: defaults
                .service_charge_rate_or_default(new.service_charge_rate_bps)
                .bps(),
            discount: new.discount,
            additional_services: new.additional_services,
            base_amount_cents: 0,
            tax_amount_cents: 0,
            service_charge_amount_cents: 0,
            discount_amount_cents: 0,
            grand_total_cents: 0,
            total_amount_cents: 0,
            status: new.status,
            payment_status: new.payment_status,
            notes: new.notes,
            special_requests: new.special_requests,
            contact: new.contact,
            created_at: now,
        };
        reservation.recompute_billing();
        reservation
    }

    /// Derives nights and every billing amount from the current inputs.
    pub fn recompute_billing(&mut self) -> BillingBreakdown {
        self.number_of_nights = nights_between(self.check_in_date, self.check_out_date);

        for item in &mut self.additional_services {
            item.total_cents = item.line_total().cents();
        }

        let breakdown = calculate(&BillingInput {
            nights: self.number_of_nights,
            price_per_night: self.price_per_night(),
            tax_rate: self.tax_rate(),
            service_charge_rate: self.service_charge_rate(),
            discount: &self.discount,
            services: &self.additional_services,
        });

        self.base_amount_cents = breakdown.base_amount.cents();
        self.tax_amount_cents = breakdown.tax_amount.cents();
        self.service_charge_amount_cents = breakdown.service_charge_amount.cents();
        self.discount_amount_cents = breakdown.discount_amount.cents();
        self.grand_total_cents = breakdown.grand_total.cents();
        self.total_amount_cents = breakdown.grand_total.cents();
        breakdown
    }

    /// The billing breakdown for the reservation as it stands.
    pub fn breakdown(&self) -> BillingBreakdown {
        calculate(&BillingInput {
            nights: self.number_of_nights,
            price_per_night: self.price_per_night(),
            tax_rate: self.tax_rate(),
            service_charge_rate: self.service_charge_rate(),
            discount: &self.discount,
            services: &self.additional_services,
        })
    }

    /// Shallow-merges a patch.
    ///
    /// Either the whole patch applies or nothing changes. Billing is
    /// recomputed when the patch touches a billing input.
    pub fn apply_patch(&mut self, patch: ReservationPatch) -> CoreResult<()> {
        validate_patch(&patch)?;

        let touches_billing = patch.touches_billing();
        let touches_dates = patch.check_in_date.is_some() || patch.check_out_date.is_some();
        let mut next = self.clone();

        if let Some(v) = patch.guest_id {
            next.guest_id = v;
        }
        if let Some(v) = patch.room_id {
            next.room_id = v;
        }
        if let Some(v) = patch.guest_name {
            next.guest_name = v;
        }
        if let Some(v) = patch.room_number {
            next.room_number = v;
        }
        if let Some(v) = patch.check_in_date {
            next.check_in_date = v;
        }
        if let Some(v) = patch.check_out_date {
            next.check_out_date = v;
        }
        if let Some(v) = patch.adults {
            next.adults = v;
        }
        if let Some(v) = patch.children {
            next.children = v;
        }
        if let Some(v) = patch.price_per_night_cents {
            next.price_per_night_cents = v;
        }
        if let Some(v) = patch.tax_rate_bps {
            next.tax_rate_bps = v;
        }
        if let Some(v) = patch.service_charge_rate_bps {
            next.service_charge_rate_bps = v;
        }
        if let Some(v) = patch.discount {
            next.discount = v;
        }
        if let Some(v) = patch.additional_services {
            next.additional_services = v;
        }
        if let Some(v) = patch.status {
            next.status = v;
        }
        if let Some(v) = patch.payment_status {
            next.payment_status = v;
        }
        if let Some(v) = patch.notes {
            next.notes = v;
        }
        if let Some(v) = patch.special_requests {
            next.special_requests = v;
        }
        if let Some(v) = patch.contact {
            next.contact = v;
        }

        if touches_dates {
            validate_stay_dates(next.check_in_date, next.check_out_date)?;
        }
        if touches_billing {
            next.recompute_billing();
        }

        *self = next;
        Ok(())
    }

    /// Moves a confirmed reservation to checked-in.
    pub fn check_in(&mut self) -> CoreResult<()> {
        self.transition(ReservationStatus::Confirmed, ReservationStatus::CheckedIn, "check in")
    }

    /// Moves a checked-in reservation to checked-out.
    pub fn check_out(&mut self) -> CoreResult<()> {
        self.transition(ReservationStatus::CheckedIn, ReservationStatus::CheckedOut, "check out")
    }

    fn transition(
        &mut self,
        from: ReservationStatus,
        to: ReservationStatus,
        action: &'static str,
    ) -> CoreResult<()> {
        if self.status != from {
            return Err(CoreError::InvalidStatusTransition {
                id: self.id,
                current: self.status,
                action,
            });
        }
        self.status = to;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::types::{Discount, PaymentStatus, Rate, ServiceLineItem};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 1, 14, 30, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_night_stay() -> NewReservation {
        NewReservation::new(4, 12, date(2030, 3, 10), date(2030, 3, 12), Money::from_cents(10_000))
    }

    #[test]
    fn test_generate_reservation_id_format() {
        for _ in 0..50 {
            let id = generate_reservation_id(2031);
            let suffix = id.strip_prefix("RES-2031-").unwrap();
            assert_eq!(suffix.len(), 4);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_draft_applies_defaults_and_billing() {
        let r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        assert_eq!(r.id, 0);
        assert!(r.reservation_id.starts_with("RES-2030-"));
        assert_eq!(r.number_of_nights, 2);
        assert_eq!(r.tax_rate_bps, 500);
        assert_eq!(r.service_charge_rate_bps, 1000);
        assert_eq!(r.base_amount_cents, 20_000);
        assert_eq!(r.tax_amount_cents, 1_000);
        assert_eq!(r.service_charge_amount_cents, 2_100);
        assert_eq!(r.grand_total_cents, 23_100);
        assert_eq!(r.total_amount_cents, 23_100);
        assert_eq!(r.created_at, now());
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_draft_keeps_explicit_zero_rates() {
        let mut new = two_night_stay();
        new.tax_rate_bps = Some(0);
        new.service_charge_rate_bps = Some(0);
        let r = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap();
        assert_eq!(r.grand_total_cents, 20_000);
    }

    #[test]
    fn test_draft_keeps_supplied_reservation_id() {
        let mut new = two_night_stay();
        new.reservation_id = Some(" RES-2030-0007 ".to_string());
        let r = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap();
        assert_eq!(r.reservation_id, "RES-2030-0007");
    }

    #[test]
    fn test_draft_rejects_past_check_in() {
        let mut new = two_night_stay();
        new.check_in_date = date(2030, 2, 27);
        let err = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InPast { .. })
        ));
    }

    #[test]
    fn test_draft_rejects_rate_that_would_overflow_billing() {
        let mut new = two_night_stay();
        new.check_out_date = date(2030, 3, 13);
        new.price_per_night_cents = i64::MAX / 2;
        let err = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_patch_rejects_oversized_price_and_keeps_totals() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        let result = r.apply_patch(ReservationPatch {
            price_per_night_cents: Some(crate::MAX_PRICE_CENTS + 1),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(r.price_per_night_cents, 10_000);
        assert_eq!(r.grand_total_cents, 23_100);
    }

    #[test]
    fn test_import_accepts_past_stays() {
        let mut new = two_night_stay();
        new.check_in_date = date(2030, 2, 1);
        new.check_out_date = date(2030, 2, 4);
        new.status = ReservationStatus::CheckedOut;
        let r = Reservation::import(new, &BillingDefaults::default(), now()).unwrap();
        assert_eq!(r.number_of_nights, 3);
        assert_eq!(r.status, ReservationStatus::CheckedOut);

        let mut bad = two_night_stay();
        bad.adults = 0;
        assert!(Reservation::import(bad, &BillingDefaults::default(), now()).is_err());
    }

    #[test]
    fn test_draft_fills_service_totals() {
        let mut new = two_night_stay();
        let mut line = ServiceLineItem::new("Breakfast", 2, 1_500);
        line.total_cents = 0;
        new.additional_services = vec![line];
        let r = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap();
        assert_eq!(r.additional_services[0].total_cents, 3_000);
        assert_eq!(r.grand_total_cents, 26_565);
    }

    #[test]
    fn test_patch_without_billing_inputs_leaves_amounts() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        let before = r.clone();
        r.apply_patch(ReservationPatch {
            status: Some(ReservationStatus::Confirmed),
            notes: Some(Some("VIP".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.notes.as_deref(), Some("VIP"));
        assert_eq!(r.grand_total_cents, before.grand_total_cents);
        assert_eq!(r.created_at, before.created_at);
    }

    #[test]
    fn test_patch_recomputes_on_date_change() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        r.apply_patch(ReservationPatch {
            check_out_date: Some(date(2030, 3, 14)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(r.number_of_nights, 4);
        assert_eq!(r.base_amount_cents, 40_000);
        assert_eq!(r.grand_total_cents, 46_200);
    }

    #[test]
    fn test_patch_recomputes_on_discount_change() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        r.apply_patch(ReservationPatch {
            discount: Some(Discount::Percentage {
                rate: Rate::from_bps(1000),
                reason: "Loyalty".to_string(),
            }),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(r.discount_amount_cents, 2_310);
        assert_eq!(r.grand_total_cents, 20_790);
    }

    #[test]
    fn test_invalid_patch_changes_nothing() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        let before = r.clone();
        let result = r.apply_patch(ReservationPatch {
            notes: Some(Some("changed".to_string())),
            check_out_date: Some(date(2030, 3, 9)),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(r, before);
    }

    #[test]
    fn test_patch_can_clear_optional_text() {
        let mut new = two_night_stay();
        new.contact = Some("+1 555 0100".to_string());
        let mut r = Reservation::draft(new, &BillingDefaults::default(), now()).unwrap();
        r.apply_patch(ReservationPatch {
            contact: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(r.contact, None);
    }

    #[test]
    fn test_check_in_and_out() {
        let mut r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        r.id = 9;

        let err = r.check_in().unwrap_err();
        assert_eq!(err.to_string(), "Reservation 9 is pending, cannot check in");

        r.status = ReservationStatus::Confirmed;
        r.check_in().unwrap();
        assert_eq!(r.status, ReservationStatus::CheckedIn);

        assert!(r.check_in().is_err());
        r.check_out().unwrap();
        assert_eq!(r.status, ReservationStatus::CheckedOut);
        assert!(r.check_out().is_err());
    }

    #[test]
    fn test_breakdown_matches_stored_amounts() {
        let r = Reservation::draft(two_night_stay(), &BillingDefaults::default(), now()).unwrap();
        let b = r.breakdown();
        assert_eq!(b.grand_total, r.grand_total());
        assert_eq!(b.tax_amount, r.tax_amount());
    }
}
