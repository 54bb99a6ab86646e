//! # Error Types
//!
//! Domain-specific error types for frontdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  frontdesk-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  frontdesk-db errors (separate crate)                                  │
//! │  └── DbError          - NotFound + storage failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → front-desk UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, reservation id, status)
//! 3. Errors are enum variants, never String
//! 4. Invalid input is rejected, never coerced to zero

use thiserror::Error;

use crate::types::ReservationStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. Lookup failures
/// (`NotFound`) belong to the storage layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The reservation is not in a state that allows the requested action.
    ///
    /// ## When This Occurs
    /// - Checking in a reservation that is not `confirmed`
    /// - Checking out a reservation that is not `checkedin`
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Check In" on a pending reservation
    ///      │
    ///      ▼
    /// InvalidStatusTransition { id: 7, current: Pending, action: "check in" }
    ///      │
    ///      ▼
    /// UI shows: "Reservation 7 is pending, cannot check in"
    /// ```
    #[error("Reservation {id} is {current}, cannot {action}")]
    InvalidStatusTransition {
        id: i64,
        current: ReservationStatus,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They replace silent coercion of bad numbers to zero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// A date must come strictly after another date.
    #[error("{field} must be after {other}")]
    MustBeAfter { field: String, other: String },

    /// A date lies in the past.
    #[error("{field} cannot be in the past")]
    InPast { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidStatusTransition {
            id: 7,
            current: ReservationStatus::Pending,
            action: "check in",
        };
        assert_eq!(err.to_string(), "Reservation 7 is pending, cannot check in");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "guest_id".to_string(),
        };
        assert_eq!(err.to_string(), "guest_id is required");

        let err = ValidationError::MustBeAfter {
            field: "check_out_date".to_string(),
            other: "check_in_date".to_string(),
        };
        assert_eq!(err.to_string(), "check_out_date must be after check_in_date");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "room_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
