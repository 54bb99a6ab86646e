//! # frontdesk-db: Reservation Store for the Front Desk
//!
//! This crate owns reservation records: the store contract, an in-memory
//! backend, a SQLite backend, the embedded seed dataset and configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Front Desk Data Flow                             │
//! │                                                                         │
//! │  Front-desk form handler (create / edit / check in / pay)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  frontdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌──────────────────┐   ┌──────────────┐  │   │
//! │  │   │    config     │   │    repository    │   │  migrations  │  │   │
//! │  │   │               │   │                  │   │  (embedded)  │  │   │
//! │  │   │ FrontDesk-    │──►│ ReservationStore │   │              │  │   │
//! │  │   │ Config        │   │  ├─ InMemory     │   │ 001_create_  │  │   │
//! │  │   │ open_store()  │   │  └─ Sqlite ──────┼──►│ reservations │  │   │
//! │  │   └───────────────┘   └──────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  frontdesk-core: validation, billing, lifecycle (pure)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - `ReservationStore` trait and both backends
//! - [`config`] - `frontdesk.toml` + `FRONTDESK_*` environment
//! - [`pool`] - SQLite connection pool
//! - [`migrations`] - Embedded database migrations
//! - [`seed`] - Embedded seed dataset
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frontdesk_db::{open_store, FrontDeskConfig};
//!
//! let config = FrontDeskConfig::load(None)?;
//! let store = open_store(&config).await?;
//!
//! let reservations = store.get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{FrontDeskConfig, StoreBackend};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::memory::{InMemoryReservationStore, LatencyProfile};
pub use repository::sqlite::SqliteReservationStore;
pub use repository::ReservationStore;

use std::sync::Arc;
use tracing::info;

/// Builds the store selected by `config`.
///
/// ## What This Does
/// - `memory`: a fresh in-memory store, seeded and delayed as configured
/// - `sqlite`: opens (and migrates) the database file, seeding an empty table
///   when `seed_on_start` is set
pub async fn open_store(config: &FrontDeskConfig) -> DbResult<Arc<dyn ReservationStore>> {
    let defaults = config.billing_defaults();

    match config.store.backend {
        StoreBackend::Memory => {
            let store = if config.store.seed_on_start {
                InMemoryReservationStore::seeded(defaults)?
            } else {
                InMemoryReservationStore::new().with_defaults(defaults)
            };
            let latency = if config.store.simulate_latency {
                LatencyProfile::simulated()
            } else {
                LatencyProfile::none()
            };

            info!(
                reservations = store.len().await,
                simulate_latency = config.store.simulate_latency,
                "In-memory reservation store ready"
            );
            Ok(Arc::new(store.with_latency(latency)))
        }
        StoreBackend::Sqlite => {
            let path = config
                .database_path()
                .ok_or_else(|| DbError::Config("no database path".into()))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
            }

            let db = Database::new(DbConfig::new(path)).await?;
            let store = db.reservations_with(defaults);
            if config.store.seed_on_start {
                store.seed_if_empty().await?;
            }

            info!(reservations = store.count().await?, "SQLite reservation store ready");
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::{ReservationFilter, ReservationStatus};

    #[tokio::test]
    async fn test_open_memory_store_seeded() {
        let store = open_store(&FrontDeskConfig::default()).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_open_memory_store_empty() {
        let mut config = FrontDeskConfig::default();
        config.store.seed_on_start = false;
        let store = open_store(&config).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FrontDeskConfig::default();
        config.store.backend = StoreBackend::Sqlite;
        config.store.database_path = Some(dir.path().join("data").join("frontdesk.db"));

        let store = open_store(&config).await.unwrap();
        let cancelled = store
            .list(&ReservationFilter::by_status(ReservationStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(cancelled.len(), 1);

        // Reopening does not seed twice
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 8);
    }
}
