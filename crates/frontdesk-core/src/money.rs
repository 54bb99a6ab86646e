//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, a 10% discount on $231.00 is 23.100000000000001          │
//! │  and the folio total drifts from what the guest is quoted.             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    23100 cents × 10% = 2310 cents, exactly                             │
//! │    Every derived amount is rounded once, to the cent                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use frontdesk_core::money::Money;
//!
//! let rate = Money::from_cents(12_500);   // $125.00 per night
//! let stay = rate.multiply_quantity(3);   // $375.00
//! let total = stay + Money::from_cents(1_500);
//! assert_eq!(total.cents(), 39_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Intermediate billing values may go negative before
///   the grand total is clamped
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Room rate ──► base amount ──┐                                          │
/// │                              ├──► subtotal ──► tax ──► service charge   │
/// │  Service lines ──► services ─┘                              │           │
/// │                                                             ▼           │
/// │                                         discount ──► grand total        │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-26_900).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(500).non_negative().cents(), 500);
    /// ```
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Applies a rate (tax, service charge, percentage discount) to this amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half-up to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    /// use frontdesk_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(20_000); // $200.00
    /// let tax = subtotal.apply_rate(Rate::from_bps(500)); // 5%
    /// assert_eq!(tax.cents(), 1_000);
    ///
    /// // $10.00 × 8.25% = $0.825 → $0.83
    /// let tax = Money::from_cents(1_000).apply_rate(Rate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // i128 prevents overflow on large folios
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        let cents = i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(cents)
    }

    /// Multiplies money by a quantity (nights, service units).
    ///
    /// Saturates at the i64 bounds; booking validation keeps real folios
    /// far below them.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let breakfast = Money::from_cents(1_500); // $15.00
    /// assert_eq!(breakfast.multiply_quantity(2).cents(), 3_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The UI formats for the locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Summing line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
