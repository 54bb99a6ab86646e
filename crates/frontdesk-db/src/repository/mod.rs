//! # Reservation Store
//!
//! The contract every reservation backend implements, and the backends.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Front-desk form handler                                               │
//! │       │                                                                 │
//! │       │  store.create(new).await?                                      │
//! │       ▼                                                                 │
//! │  Arc<dyn ReservationStore>                                             │
//! │  ├── get_all / list(filter) / get_by_id                                │
//! │  ├── create / update / update_payment / delete                         │
//! │  └── check_in / check_out                                              │
//! │       │                                                                 │
//! │       ├──► InMemoryReservationStore  (seeded Vec, optional latency)    │
//! │       └──► SqliteReservationStore    (sqlx, survives restarts)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees (all backends)
//! - Each operation is one atomic step; no partial update is observable.
//! - Ids are assigned by the store and never reused, even after delete.
//! - Every returned reservation is an owned copy.
//! - Derived fields (nights, billing amounts) are computed by the store,
//!   never accepted from callers.

use async_trait::async_trait;
use frontdesk_core::{
    NewReservation, PaymentStatus, Reservation, ReservationFilter, ReservationPatch,
};

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

/// Storage for reservation records.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Every reservation, in insertion order.
    async fn get_all(&self) -> DbResult<Vec<Reservation>>;

    /// Reservations matching `filter`, in insertion order.
    async fn list(&self, filter: &ReservationFilter) -> DbResult<Vec<Reservation>>;

    /// Fails with `NotFound` for an unknown id.
    async fn get_by_id(&self, id: i64) -> DbResult<Reservation>;

    /// Validates, assigns identity, derives billing, stores.
    async fn create(&self, new: NewReservation) -> DbResult<Reservation>;

    /// Shallow-merges `patch`, recomputing billing when a billing input changed.
    async fn update(&self, id: i64, patch: ReservationPatch) -> DbResult<Reservation>;

    /// Sets only the payment status.
    async fn update_payment(&self, id: i64, payment_status: PaymentStatus) -> DbResult<Reservation>;

    /// Removes the record permanently and returns it.
    async fn delete(&self, id: i64) -> DbResult<Reservation>;

    /// `confirmed` → `checkedin`.
    async fn check_in(&self, id: i64) -> DbResult<Reservation>;

    /// `checkedin` → `checkedout`.
    async fn check_out(&self, id: i64) -> DbResult<Reservation>;
}
