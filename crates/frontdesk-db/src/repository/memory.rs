//! # In-Memory Reservation Store
//!
//! Holds reservations in a `Vec` behind an async `RwLock`. Nothing survives
//! a restart.
//!
//! ## Concurrency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Arc<InMemoryReservationStore>                                         │
//! │       │                                                                 │
//! │       └── RwLock<Inner>                                                 │
//! │              ├── reservations: Vec<Reservation>  (insertion order)      │
//! │              └── next_id: i64                    (never decreases)      │
//! │                                                                         │
//! │  Readers share the lock; every mutation takes the write lock for the   │
//! │  whole read-modify-write, so a half-applied update is never visible.   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Simulated Latency
//! The front-desk UI was built against a mock backend with fixed delays.
//! [`LatencyProfile::simulated`] reproduces them for demos; the default is
//! no delay. The delay runs before the lock is taken.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use frontdesk_core::{
    BillingDefaults, NewReservation, PaymentStatus, Reservation, ReservationFilter,
    ReservationPatch,
};
use tokio::sync::RwLock;
use tracing::debug;

use super::ReservationStore;
use crate::error::{DbError, DbResult};
use crate::seed::seed_reservations;

// =============================================================================
// Latency Profile
// =============================================================================

/// Artificial per-operation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyProfile {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub update_payment: Duration,
    pub delete: Duration,
}

impl LatencyProfile {
    /// No delay.
    pub const fn none() -> Self {
        LatencyProfile {
            get_all: Duration::ZERO,
            get_by_id: Duration::ZERO,
            create: Duration::ZERO,
            update: Duration::ZERO,
            update_payment: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }

    /// The mock backend's delays.
    pub const fn simulated() -> Self {
        LatencyProfile {
            get_all: Duration::from_millis(350),
            get_by_id: Duration::from_millis(200),
            create: Duration::from_millis(500),
            update: Duration::from_millis(400),
            update_payment: Duration::from_millis(300),
            delete: Duration::from_millis(300),
        }
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug)]
struct Inner {
    reservations: Vec<Reservation>,
    next_id: i64,
}

impl Inner {
    fn position(&self, id: i64) -> DbResult<usize> {
        self.reservations
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DbError::reservation_not_found(id))
    }

    fn insert(&mut self, mut reservation: Reservation) -> Reservation {
        reservation.id = self.next_id;
        self.next_id += 1;
        self.reservations.push(reservation.clone());
        reservation
    }

    /// Applies `f` to a copy and commits only if it succeeds.
    fn modify<F>(&mut self, id: i64, f: F) -> DbResult<Reservation>
    where
        F: FnOnce(&mut Reservation) -> DbResult<()>,
    {
        let idx = self.position(id)?;
        let mut next = self.reservations[idx].clone();
        f(&mut next)?;
        self.reservations[idx] = next.clone();
        Ok(next)
    }
}

/// Reservation store backed by process memory.
///
/// ## Example
/// ```rust
/// use chrono::{Days, Utc};
/// use frontdesk_core::{Money, NewReservation};
/// use frontdesk_db::{InMemoryReservationStore, ReservationStore};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), frontdesk_db::DbError> {
/// let store = InMemoryReservationStore::new();
/// let check_in = Utc::now().date_naive() + Days::new(7);
/// let check_out = check_in + Days::new(2);
///
/// let created = store
///     .create(NewReservation::new(1, 101, check_in, check_out, Money::from_cents(10_000)))
///     .await?;
/// assert_eq!(created.id, 1);
/// assert_eq!(created.grand_total_cents, 23_100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryReservationStore {
    inner: RwLock<Inner>,
    defaults: BillingDefaults,
    latency: LatencyProfile,
}

impl Default for InMemoryReservationStore {
    fn default() -> Self {
        InMemoryReservationStore::new()
    }
}

impl InMemoryReservationStore {
    /// Empty store, default billing rates, no latency.
    pub fn new() -> Self {
        InMemoryReservationStore {
            inner: RwLock::new(Inner {
                reservations: Vec::new(),
                next_id: 1,
            }),
            defaults: BillingDefaults::default(),
            latency: LatencyProfile::none(),
        }
    }

    /// Store pre-loaded with the embedded seed dataset (ids 1..=n).
    pub fn seeded(defaults: BillingDefaults) -> DbResult<Self> {
        let mut store = InMemoryReservationStore::new().with_defaults(defaults);
        let seed = seed_reservations(&store.defaults)?;
        let inner = store.inner.get_mut();
        for reservation in seed {
            inner.insert(reservation);
        }
        Ok(store)
    }

    /// Sets the billing defaults used by `create`.
    pub fn with_defaults(mut self, defaults: BillingDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the artificial latency.
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Number of stored reservations.
    pub async fn len(&self) -> usize {
        self.inner.read().await.reservations.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn get_all(&self) -> DbResult<Vec<Reservation>> {
        delay(self.latency.get_all).await;
        Ok(self.inner.read().await.reservations.clone())
    }

    async fn list(&self, filter: &ReservationFilter) -> DbResult<Vec<Reservation>> {
        let filter = filter.normalized()?;
        delay(self.latency.get_all).await;
        let inner = self.inner.read().await;
        Ok(inner
            .reservations
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Reservation> {
        delay(self.latency.get_by_id).await;
        let inner = self.inner.read().await;
        let idx = inner.position(id)?;
        Ok(inner.reservations[idx].clone())
    }

    async fn create(&self, new: NewReservation) -> DbResult<Reservation> {
        delay(self.latency.create).await;
        let draft = Reservation::draft(new, &self.defaults, Utc::now())?;
        let created = self.inner.write().await.insert(draft);
        debug!(
            id = created.id,
            reservation_id = %created.reservation_id,
            grand_total = %created.grand_total(),
            "Reservation created"
        );
        Ok(created)
    }

    async fn update(&self, id: i64, patch: ReservationPatch) -> DbResult<Reservation> {
        delay(self.latency.update).await;
        let updated = self
            .inner
            .write()
            .await
            .modify(id, |r| r.apply_patch(patch).map_err(DbError::from))?;
        debug!(id, grand_total = %updated.grand_total(), "Reservation updated");
        Ok(updated)
    }

    async fn update_payment(&self, id: i64, payment_status: PaymentStatus) -> DbResult<Reservation> {
        delay(self.latency.update_payment).await;
        let updated = self.inner.write().await.modify(id, |r| {
            r.payment_status = payment_status;
            Ok(())
        })?;
        debug!(id, ?payment_status, "Payment status updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> DbResult<Reservation> {
        delay(self.latency.delete).await;
        let mut inner = self.inner.write().await;
        let idx = inner.position(id)?;
        let removed = inner.reservations.remove(idx);
        debug!(id, reservation_id = %removed.reservation_id, "Reservation deleted");
        Ok(removed)
    }

    async fn check_in(&self, id: i64) -> DbResult<Reservation> {
        delay(self.latency.update).await;
        let updated = self
            .inner
            .write()
            .await
            .modify(id, |r| r.check_in().map_err(DbError::from))?;
        debug!(id, "Guest checked in");
        Ok(updated)
    }

    async fn check_out(&self, id: i64) -> DbResult<Reservation> {
        delay(self.latency.update).await;
        let updated = self
            .inner
            .write()
            .await
            .modify(id, |r| r.check_out().map_err(DbError::from))?;
        debug!(id, "Guest checked out");
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use frontdesk_core::{Discount, Money, Rate, ReservationStatus, ServiceLineItem};
    use std::sync::Arc;

    fn upcoming(days_ahead: u64, nights: u64) -> (NaiveDate, NaiveDate) {
        let check_in = Utc::now().date_naive() + Days::new(days_ahead);
        (check_in, check_in + Days::new(nights))
    }

    fn booking(guest: &str, room: &str) -> NewReservation {
        let (check_in, check_out) = upcoming(10, 2);
        let mut new = NewReservation::new(1, 101, check_in, check_out, Money::from_cents(10_000));
        new.guest_name = Some(guest.to_string());
        new.room_number = Some(room.to_string());
        new
    }

    #[tokio::test]
    async fn test_create_on_empty_store_assigns_first_id() {
        let store = InMemoryReservationStore::new();
        assert!(store.is_empty().await);

        let created = store.create(booking("Ana", "101")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.number_of_nights, 2);
        assert_eq!(created.grand_total_cents, 23_100);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_record() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();
        let fetched = store.get_by_id(created.id).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryReservationStore::new();
        let first = store.create(booking("Ana", "101")).await.unwrap();
        let second = store.create(booking("Ben", "102")).await.unwrap();
        store.delete(second.id).await.unwrap();

        let third = store.create(booking("Cai", "103")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();
        let deleted = store.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);

        let err = store.get_by_id(created.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Reservation with Id {} not found", created.id));
        assert!(store.delete(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_collection_unchanged() {
        let store = InMemoryReservationStore::seeded(BillingDefaults::default()).unwrap();
        let before = store.get_all().await.unwrap();

        let patch = ReservationPatch {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        };
        let err = store.update(999, patch).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.get_all().await.unwrap(), before);

        assert!(store
            .update_payment(999, PaymentStatus::Paid)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_update_recomputes_billing() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();

        let patch = ReservationPatch {
            additional_services: Some(vec![ServiceLineItem::new("Breakfast", 2, 1_500)]),
            ..Default::default()
        };
        let updated = store.update(created.id, patch).await.unwrap();
        assert_eq!(updated.grand_total_cents, 26_565);
        assert_eq!(store.get_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_stored_record() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();

        let patch = ReservationPatch {
            notes: Some(Some("should not stick".to_string())),
            discount: Some(Discount::Percentage {
                rate: Rate::from_bps(15_000),
                reason: String::new(),
            }),
            ..Default::default()
        };
        let err = store.update(created.id, patch).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(store.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_invalid_create_is_not_stored() {
        let store = InMemoryReservationStore::new();
        let mut new = booking("Ana", "101");
        new.adults = 0;
        assert!(matches!(
            store.create(new).await.unwrap_err(),
            DbError::Validation(_)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_with_oversized_rate_is_rejected() {
        let store = InMemoryReservationStore::new();
        let mut new = booking("Ana", "101");
        new.price_per_night_cents = i64::MAX / 2;
        assert!(matches!(
            store.create(new).await.unwrap_err(),
            DbError::Validation(_)
        ));

        let mut new = booking("Ana", "101");
        new.price_per_night_cents = frontdesk_core::MAX_PRICE_CENTS + 1;
        assert!(store.create(new).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_payment_changes_only_payment() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();
        let updated = store.update_payment(created.id, PaymentStatus::Paid).await.unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.grand_total_cents, created.grand_total_cents);
        assert_eq!(updated.status, created.status);
    }

    #[tokio::test]
    async fn test_check_in_and_out() {
        let store = InMemoryReservationStore::new();
        let created = store.create(booking("Ana", "101")).await.unwrap();

        let err = store.check_in(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));

        store
            .update(
                created.id,
                ReservationPatch {
                    status: Some(ReservationStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let checked_in = store.check_in(created.id).await.unwrap();
        assert_eq!(checked_in.status, ReservationStatus::CheckedIn);
        let checked_out = store.check_out(created.id).await.unwrap();
        assert_eq!(checked_out.status, ReservationStatus::CheckedOut);

        assert!(store.check_out(42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_query() {
        let store = InMemoryReservationStore::seeded(BillingDefaults::default()).unwrap();
        let all = store.list(&ReservationFilter::default()).await.unwrap();
        assert_eq!(all.len(), 8);

        let confirmed = store
            .list(&ReservationFilter::by_status(ReservationStatus::Confirmed))
            .await
            .unwrap();
        assert!(!confirmed.is_empty());
        assert!(confirmed.iter().all(|r| r.status == ReservationStatus::Confirmed));

        let suite = store
            .list(&ReservationFilter {
                status: None,
                query: Some("  suite ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite[0].guest_name.as_deref(), Some("Henrik Larsen"));
    }

    #[tokio::test]
    async fn test_seeded_ids_continue_after_seed() {
        let store = InMemoryReservationStore::seeded(BillingDefaults::default()).unwrap();
        let ids: Vec<i64> = store.get_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        let created = store.create(booking("Ana", "101")).await.unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_custom_defaults_apply_on_create() {
        let defaults = BillingDefaults {
            tax_rate: Rate::from_bps(0),
            service_charge_rate: Rate::from_bps(0),
        };
        let store = InMemoryReservationStore::new().with_defaults(defaults);
        let created = store.create(booking("Ana", "101")).await.unwrap();
        assert_eq!(created.grand_total_cents, 20_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_delays_operations() {
        let store = InMemoryReservationStore::new().with_latency(LatencyProfile::simulated());
        let started = tokio::time::Instant::now();
        store.get_all().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(InMemoryReservationStore::new());
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(booking(&format!("Guest {i}"), "101")).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }
}
