//! # Store Error Types
//!
//! Error types for reservation store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (frontdesk-core)   sqlx::Error            │
//! │       │                                               │                 │
//! │       └──────────────────────┬────────────────────────┘                 │
//! │                              ▼                                          │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Front-desk UI shows the message                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use frontdesk_core::{CoreError, ValidationError};
use thiserror::Error;

/// Reservation store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No record with the given id.
    ///
    /// ## When This Occurs
    /// - `get_by_id`, `update`, `update_payment`, `delete`, `check_in`,
    ///   `check_out` with an unknown id
    #[error("{entity} with Id {id} not found")]
    NotFound { entity: String, id: String },

    /// Request rejected by a booking rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business rule violation (e.g. checking in a pending reservation).
    #[error(transparent)]
    Core(CoreError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A JSON column or the seed dataset could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// NotFound for a reservation id.
    pub fn reservation_not_found(id: i64) -> Self {
        DbError::not_found("Reservation", id)
    }

    /// True for the lookup-failure case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Flattens `CoreError::Validation` so callers match one variant.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => DbError::Validation(v),
            other => DbError::Core(other),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::ColumnDecode   → DbError::Serialization
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            // CHECK constraint failures land here too
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DbError::Serialization(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::ReservationStatus;

    #[test]
    fn test_not_found_message_carries_id() {
        let err = DbError::reservation_not_found(42);
        assert_eq!(err.to_string(), "Reservation with Id 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_core_validation_is_flattened() {
        let core: CoreError = ValidationError::Required {
            field: "guest_id".to_string(),
        }
        .into();
        let err: DbError = core.into();
        assert!(matches!(err, DbError::Validation(ValidationError::Required { .. })));
        assert_eq!(err.to_string(), "guest_id is required");
    }

    #[test]
    fn test_transition_error_is_wrapped() {
        let err: DbError = CoreError::InvalidStatusTransition {
            id: 3,
            current: ReservationStatus::CheckedOut,
            action: "check in",
        }
        .into();
        assert!(matches!(err, DbError::Core(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }
}
