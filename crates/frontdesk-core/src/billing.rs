//! # Billing Calculator
//!
//! Derives the monetary breakdown of a reservation from its stay and
//! service inputs. Pure: same input, same output, no side effects.
//!
//! ## Calculation Order
//! Tax and service charge compound, so the order matters:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. base              = nights × price_per_night   (0 when nights = 0) │
//! │  2. subtotal          = base + Σ(quantity × price_per_unit)            │
//! │  3. tax               = subtotal × tax_rate                            │
//! │  4. subtotal_with_tax = subtotal + tax                                 │
//! │  5. service_charge    = subtotal_with_tax × service_charge_rate        │
//! │  6. discount          = percentage: (subtotal_with_tax + service) × r  │
//! │                         fixed:      amount                             │
//! │                         none:       0                                  │
//! │  7. grand_total       = max(0, subtotal + tax + service − discount)    │
//! │  8. reported base/tax/service/discount are each clamped at 0           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 7 subtracts the raw intermediates and clamps only the total;
//! step 8 clamps the reported components individually.
//!
//! ## Example
//! ```rust
//! use frontdesk_core::billing::{calculate, BillingInput};
//! use frontdesk_core::{Discount, Money, Rate};
//!
//! let discount = Discount::Percentage { rate: Rate::from_bps(1000), reason: String::new() };
//! let breakdown = calculate(&BillingInput {
//!     nights: 2,
//!     price_per_night: Money::from_cents(10_000),
//!     tax_rate: Rate::from_bps(500),
//!     service_charge_rate: Rate::from_bps(1000),
//!     discount: &discount,
//!     services: &[],
//! });
//!
//! assert_eq!(breakdown.discount_amount.cents(), 2_310);
//! assert_eq!(breakdown.grand_total.cents(), 20_790);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Discount, Rate, ServiceLineItem};
use crate::{DEFAULT_SERVICE_CHARGE_RATE_BPS, DEFAULT_TAX_RATE_BPS};

// =============================================================================
// Inputs
// =============================================================================

/// Everything the calculator needs for one reservation.
#[derive(Debug, Clone, Copy)]
pub struct BillingInput<'a> {
    /// Nights stayed, never negative.
    pub nights: i64,
    pub price_per_night: Money,
    pub tax_rate: Rate,
    pub service_charge_rate: Rate,
    pub discount: &'a Discount,
    pub services: &'a [ServiceLineItem],
}

/// Rates applied when a reservation does not carry its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDefaults {
    pub tax_rate: Rate,
    pub service_charge_rate: Rate,
}

impl Default for BillingDefaults {
    /// 5% tax, 10% service charge.
    fn default() -> Self {
        BillingDefaults {
            tax_rate: Rate::from_bps(DEFAULT_TAX_RATE_BPS),
            service_charge_rate: Rate::from_bps(DEFAULT_SERVICE_CHARGE_RATE_BPS),
        }
    }
}

impl BillingDefaults {
    /// Resolves an optional tax rate in basis points.
    pub fn tax_rate_or_default(&self, bps: Option<u32>) -> Rate {
        bps.map(Rate::from_bps).unwrap_or(self.tax_rate)
    }

    /// Resolves an optional service charge rate in basis points.
    pub fn service_charge_rate_or_default(&self, bps: Option<u32>) -> Rate {
        bps.map(Rate::from_bps).unwrap_or(self.service_charge_rate)
    }
}

// =============================================================================
// Output
// =============================================================================

/// The monetary breakdown of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillingBreakdown {
    pub base_amount: Money,
    pub services_total: Money,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub subtotal_with_tax: Money,
    pub service_charge_amount: Money,
    pub discount_amount: Money,
    pub grand_total: Money,
}

// =============================================================================
// Calculator
// =============================================================================

/// Number of nights between two calendar dates, floored at zero.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use frontdesk_core::billing::nights_between;
///
/// let check_in = NaiveDate::from_ymd_opt(2030, 3, 30).unwrap();
/// let check_out = NaiveDate::from_ymd_opt(2030, 4, 2).unwrap();
/// assert_eq!(nights_between(check_in, check_out), 3);
/// assert_eq!(nights_between(check_out, check_in), 0);
/// ```
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

/// Sum of `quantity × price_per_unit` over all service lines.
pub fn services_total(services: &[ServiceLineItem]) -> Money {
    services.iter().map(ServiceLineItem::line_total).sum()
}

/// Runs the billing calculation.
pub fn calculate(input: &BillingInput<'_>) -> BillingBreakdown {
    let base_amount = if input.nights > 0 {
        input.price_per_night.multiply_quantity(input.nights)
    } else {
        Money::zero()
    };

    let services_total = services_total(input.services);
    let subtotal = base_amount + services_total;
    let tax_amount = subtotal.apply_rate(input.tax_rate);
    let subtotal_with_tax = subtotal + tax_amount;
    let service_charge_amount = subtotal_with_tax.apply_rate(input.service_charge_rate);

    let discount_amount = match input.discount {
        Discount::None => Money::zero(),
        Discount::Percentage { rate, .. } => (subtotal_with_tax + service_charge_amount).apply_rate(*rate),
        Discount::Fixed { amount, .. } => *amount,
    };

    let grand_total = (subtotal + tax_amount + service_charge_amount - discount_amount).non_negative();

    BillingBreakdown {
        base_amount: base_amount.non_negative(),
        services_total,
        subtotal,
        tax_amount: tax_amount.non_negative(),
        subtotal_with_tax,
        service_charge_amount: service_charge_amount.non_negative(),
        discount_amount: discount_amount.non_negative(),
        grand_total,
    }
}

/// A live quote for the new-reservation form: nights plus breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub nights: i64,
    pub breakdown: BillingBreakdown,
}

/// Prices a stay without creating a reservation.
pub fn quote(
    check_in: NaiveDate,
    check_out: NaiveDate,
    price_per_night: Money,
    tax_rate: Rate,
    service_charge_rate: Rate,
    discount: &Discount,
    services: &[ServiceLineItem],
) -> Quote {
    let nights = nights_between(check_in, check_out);
    let breakdown = calculate(&BillingInput {
        nights,
        price_per_night,
        tax_rate,
        service_charge_rate,
        discount,
        services,
    });
    Quote { nights, breakdown }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a<'a>(discount: &'a Discount, services: &'a [ServiceLineItem]) -> BillingInput<'a> {
        BillingInput {
            nights: 2,
            price_per_night: Money::from_cents(10_000),
            tax_rate: Rate::from_bps(500),
            service_charge_rate: Rate::from_bps(1000),
            discount,
            services,
        }
    }

    #[test]
    fn test_no_discount() {
        let b = calculate(&scenario_a(&Discount::None, &[]));
        assert_eq!(b.base_amount.cents(), 20_000);
        assert_eq!(b.tax_amount.cents(), 1_000);
        assert_eq!(b.subtotal_with_tax.cents(), 21_000);
        assert_eq!(b.service_charge_amount.cents(), 2_100);
        assert_eq!(b.discount_amount, Money::zero());
        assert_eq!(b.grand_total.cents(), 23_100);
    }

    #[test]
    fn test_percentage_discount_applies_after_service_charge() {
        let discount = Discount::Percentage {
            rate: Rate::from_bps(1000),
            reason: "Loyalty".to_string(),
        };
        let b = calculate(&scenario_a(&discount, &[]));
        assert_eq!(b.discount_amount.cents(), 2_310);
        assert_eq!(b.grand_total.cents(), 20_790);
    }

    #[test]
    fn test_fixed_discount_larger_than_folio_clamps_to_zero() {
        let discount = Discount::Fixed {
            amount: Money::from_cents(50_000),
            reason: "Complaint".to_string(),
        };
        let b = calculate(&scenario_a(&discount, &[]));
        assert_eq!(b.discount_amount.cents(), 50_000);
        assert_eq!(b.grand_total, Money::zero());
    }

    #[test]
    fn test_services_are_taxed_and_charged() {
        let services = [ServiceLineItem::new("Breakfast", 2, 1_500)];
        let b = calculate(&scenario_a(&Discount::None, &services));
        assert_eq!(b.services_total.cents(), 3_000);
        assert_eq!(b.subtotal.cents(), 23_000);
        assert_eq!(b.tax_amount.cents(), 1_150);
        assert_eq!(b.subtotal_with_tax.cents(), 24_150);
        assert_eq!(b.service_charge_amount.cents(), 2_415);
        assert_eq!(b.grand_total.cents(), 26_565);
    }

    #[test]
    fn test_services_use_quantity_not_stored_total() {
        let mut line = ServiceLineItem::new("Parking", 3, 800);
        line.total_cents = 1;
        let b = calculate(&scenario_a(&Discount::None, &[line]));
        assert_eq!(b.services_total.cents(), 2_400);
    }

    #[test]
    fn test_zero_nights_has_no_base() {
        let mut input = scenario_a(&Discount::None, &[]);
        input.nights = 0;
        let b = calculate(&input);
        assert_eq!(b.base_amount, Money::zero());
        assert_eq!(b.grand_total, Money::zero());
    }

    #[test]
    fn test_base_is_nights_times_rate() {
        for nights in 0..30 {
            for price in [0, 1, 9_999, 25_000] {
                let b = calculate(&BillingInput {
                    nights,
                    price_per_night: Money::from_cents(price),
                    tax_rate: Rate::from_bps(500),
                    service_charge_rate: Rate::from_bps(1000),
                    discount: &Discount::None,
                    services: &[],
                });
                assert_eq!(b.base_amount.cents(), nights * price);
                assert!(!b.grand_total.is_negative());
            }
        }
    }

    #[test]
    fn test_negative_fixed_discount_is_reported_as_zero() {
        // Reported discount clamps, the total uses the raw value
        let discount = Discount::Fixed {
            amount: Money::from_cents(-500),
            reason: String::new(),
        };
        let b = calculate(&scenario_a(&discount, &[]));
        assert_eq!(b.discount_amount, Money::zero());
        assert_eq!(b.grand_total.cents(), 23_600);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let services = [ServiceLineItem::new("Spa", 1, 4_500)];
        let discount = Discount::Percentage {
            rate: Rate::from_bps(1250),
            reason: String::new(),
        };
        let input = scenario_a(&discount, &services);
        assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn test_defaults() {
        let defaults = BillingDefaults::default();
        assert_eq!(defaults.tax_rate_or_default(None).bps(), 500);
        assert_eq!(defaults.service_charge_rate_or_default(None).bps(), 1000);
        assert_eq!(defaults.tax_rate_or_default(Some(0)), Rate::zero());
    }

    #[test]
    fn test_quote() {
        let check_in = NaiveDate::from_ymd_opt(2030, 1, 10).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2030, 1, 12).unwrap();
        let q = quote(
            check_in,
            check_out,
            Money::from_cents(10_000),
            Rate::from_bps(500),
            Rate::from_bps(1000),
            &Discount::None,
            &[],
        );
        assert_eq!(q.nights, 2);
        assert_eq!(q.breakdown.grand_total.cents(), 23_100);
    }
}
