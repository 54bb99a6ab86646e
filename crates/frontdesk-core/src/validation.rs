//! # Validation Module
//!
//! Business rule validation for reservation requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-desk form                                              │
//! │  ├── Required guest / room selection                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde)                                      │
//! │  ├── Dates parse as calendar dates                                     │
//! │  └── Counts are unsigned                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  ├── Stay dates, occupancy, rates, discount, service lines             │
//! │  └── Runs before any billing calculation                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use frontdesk_core::validation::{validate_quantity, validate_stay_dates};
//!
//! let check_in = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
//! let check_out = NaiveDate::from_ymd_opt(2030, 6, 4).unwrap();
//! validate_stay_dates(check_in, check_out).unwrap();
//!
//! validate_quantity(2).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{Discount, NewReservation, ReservationPatch, ServiceLineItem};
use crate::{
    MAX_FIXED_DISCOUNT_CENTS, MAX_PRICE_CENTS, MAX_RESERVATION_ID_LEN, MAX_SERVICE_QUANTITY,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// 100% in basis points.
const MAX_RATE_BPS: u32 = 10_000;

/// Longest accepted search query.
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a business reservation number.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
pub fn validate_reservation_id(reservation_id: &str) -> ValidationResult<()> {
    let reservation_id = reservation_id.trim();

    if reservation_id.is_empty() {
        return Err(ValidationError::Required {
            field: "reservation_id".to_string(),
        });
    }

    if reservation_id.chars().count() > MAX_RESERVATION_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "reservation_id".to_string(),
            max: MAX_RESERVATION_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Identity & Occupancy Validators
// =============================================================================

/// Validates a reference to a guest or room record.
///
/// ## Rules
/// - Must be selected (> 0)
pub fn validate_reference_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates the adult count. Children may be zero.
pub fn validate_adults(adults: u32) -> ValidationResult<()> {
    if adults < 1 {
        return Err(ValidationError::MustBePositive {
            field: "adults".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that check-out falls strictly after check-in.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use frontdesk_core::validation::validate_stay_dates;
///
/// let day = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
/// assert!(validate_stay_dates(day, day).is_err());
/// assert!(validate_stay_dates(day, day.succ_opt().unwrap()).is_ok());
/// ```
pub fn validate_stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<()> {
    if check_out <= check_in {
        return Err(ValidationError::MustBeAfter {
            field: "check_out_date".to_string(),
            other: "check_in_date".to_string(),
        });
    }

    Ok(())
}

/// Validates that a new booking does not start before `today`.
pub fn validate_not_in_past(check_in: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if check_in < today {
        return Err(ValidationError::InPast {
            field: "check_in_date".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a service quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_SERVICE_QUANTITY (999)
///
/// ## Edit Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Reservation: Add Service                                               │
/// │                                                                         │
/// │  Clerk enters quantity: 2                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → Error: "quantity must be positive"              │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       └── OK → line is billed                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SERVICE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SERVICE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a room rate or unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary room or service)
/// - At most MAX_PRICE_CENTS ($1,000,000.00)
///
/// ## Example
/// ```rust
/// use frontdesk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price_per_night", 12_500).is_ok());
/// assert!(validate_price_cents("price_per_night", 0).is_ok());
/// assert!(validate_price_cents("price_per_night", -100).is_err());
/// assert!(validate_price_cents("price_per_night", i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_cents(field, cents, MAX_PRICE_CENTS)
}

fn validate_cents(field: &str, cents: i64, max: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if cents > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates one additional service line.
pub fn validate_service_line(item: &ServiceLineItem) -> ValidationResult<()> {
    if item.service_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "service_name".to_string(),
        });
    }
    validate_quantity(item.quantity)?;
    validate_price_cents("price_per_unit", item.price_per_unit_cents)
}

/// Validates a discount.
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    match discount {
        Discount::None => Ok(()),
        Discount::Percentage { rate, .. } => validate_rate_bps("discount_rate", rate.bps()),
        Discount::Fixed { amount, .. } => {
            validate_cents("discount_amount", amount.cents(), MAX_FIXED_DISCOUNT_CENTS)
        }
    }
}

/// Validates a new-reservation request against `today`.
///
/// Checks run in form order, the first failure is returned.
pub fn validate_new_reservation(new: &NewReservation, today: NaiveDate) -> ValidationResult<()> {
    validate_not_in_past(new.check_in_date, today)?;
    validate_booking(new)
}

/// Validates a booking without the "not in the past" rule.
///
/// Used for imported and seeded reservations, which may describe past stays.
pub fn validate_booking(new: &NewReservation) -> ValidationResult<()> {
    if let Some(reservation_id) = &new.reservation_id {
        validate_reservation_id(reservation_id)?;
    }
    validate_reference_id("guest_id", new.guest_id)?;
    validate_reference_id("room_id", new.room_id)?;
    validate_stay_dates(new.check_in_date, new.check_out_date)?;
    validate_adults(new.adults)?;
    validate_price_cents("price_per_night", new.price_per_night_cents)?;
    if let Some(bps) = new.tax_rate_bps {
        validate_rate_bps("tax_rate", bps)?;
    }
    if let Some(bps) = new.service_charge_rate_bps {
        validate_rate_bps("service_charge_rate", bps)?;
    }
    validate_discount(&new.discount)?;
    new.additional_services
        .iter()
        .try_for_each(validate_service_line)
}

/// Validates the fields a patch sets.
///
/// Stay dates are checked on the merged record, so they are not covered here.
pub fn validate_patch(patch: &ReservationPatch) -> ValidationResult<()> {
    if let Some(id) = patch.guest_id {
        validate_reference_id("guest_id", id)?;
    }
    if let Some(id) = patch.room_id {
        validate_reference_id("room_id", id)?;
    }
    if let Some(adults) = patch.adults {
        validate_adults(adults)?;
    }
    if let Some(cents) = patch.price_per_night_cents {
        validate_price_cents("price_per_night", cents)?;
    }
    if let Some(bps) = patch.tax_rate_bps {
        validate_rate_bps("tax_rate", bps)?;
    }
    if let Some(bps) = patch.service_charge_rate_bps {
        validate_rate_bps("service_charge_rate", bps)?;
    }
    if let Some(discount) = &patch.discount {
        validate_discount(discount)?;
    }
    if let Some(services) = &patch.additional_services {
        services.iter().try_for_each(validate_service_line)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
