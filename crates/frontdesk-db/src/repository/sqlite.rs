//! # SQLite Reservation Store
//!
//! Reservations persisted in the `reservations` table.
//!
//! ## Row Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reservations row ──FromRow──► ReservationRow ──TryFrom──► Reservation │
//! │                                                                         │
//! │  discount, additional_services   JSON TEXT   (serde_json)              │
//! │  check_in_date, check_out_date   TEXT        YYYY-MM-DD                │
//! │  status, payment_status          TEXT        lowercase wire names      │
//! │  money / rates                   INTEGER     cents / basis points      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Updates
//! Read, modify in Rust (validation + billing), write back: all inside one
//! transaction, so a failed patch leaves the row as it was.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use frontdesk_core::{
    BillingDefaults, Discount, NewReservation, PaymentStatus, Reservation, ReservationFilter,
    ReservationPatch, ReservationStatus, ServiceLineItem,
};
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::ReservationStore;
use crate::error::{DbError, DbResult};
use crate::seed::seed_reservations;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, reservation_id, guest_id, room_id, guest_name, room_number,
        check_in_date, check_out_date, adults, children, number_of_nights,
        price_per_night_cents, tax_rate_bps, service_charge_rate_bps,
        discount, additional_services,
        base_amount_cents, tax_amount_cents, service_charge_amount_cents,
        discount_amount_cents, grand_total_cents, total_amount_cents,
        status, payment_status, notes, special_requests, contact, created_at
    FROM reservations
"#;

// =============================================================================
// Row Type
// =============================================================================

/// A `reservations` row as stored.
#[derive(Debug, FromRow)]
struct ReservationRow {
    id: i64,
    reservation_id: String,
    guest_id: i64,
    room_id: i64,
    guest_name: Option<String>,
    room_number: Option<String>,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    adults: i64,
    children: i64,
    number_of_nights: i64,
    price_per_night_cents: i64,
    tax_rate_bps: i64,
    service_charge_rate_bps: i64,
    discount: String,
    additional_services: String,
    base_amount_cents: i64,
    tax_amount_cents: i64,
    service_charge_amount_cents: i64,
    discount_amount_cents: i64,
    grand_total_cents: i64,
    total_amount_cents: i64,
    status: ReservationStatus,
    payment_status: PaymentStatus,
    notes: Option<String>,
    special_requests: Option<String>,
    contact: Option<String>,
    created_at: DateTime<Utc>,
}

fn to_u32(field: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value)
        .map_err(|_| DbError::Serialization(format!("{field} out of range: {value}")))
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = DbError;

    fn try_from(row: ReservationRow) -> DbResult<Self> {
        let discount: Discount = serde_json::from_str(&row.discount)?;
        let additional_services: Vec<ServiceLineItem> =
            serde_json::from_str(&row.additional_services)?;

        Ok(Reservation {
            id: row.id,
            reservation_id: row.reservation_id,
            guest_id: row.guest_id,
            room_id: row.room_id,
            guest_name: row.guest_name,
            room_number: row.room_number,
            check_in_date: row.check_in_date,
            check_out_date: row.check_out_date,
            adults: to_u32("adults", row.adults)?,
            children: to_u32("children", row.children)?,
            number_of_nights: row.number_of_nights,
            price_per_night_cents: row.price_per_night_cents,
            tax_rate_bps: to_u32("tax_rate_bps", row.tax_rate_bps)?,
            service_charge_rate_bps: to_u32("service_charge_rate_bps", row.service_charge_rate_bps)?,
            discount,
            additional_services,
            base_amount_cents: row.base_amount_cents,
            tax_amount_cents: row.tax_amount_cents,
            service_charge_amount_cents: row.service_charge_amount_cents,
            discount_amount_cents: row.discount_amount_cents,
            grand_total_cents: row.grand_total_cents,
            total_amount_cents: row.total_amount_cents,
            status: row.status,
            payment_status: row.payment_status,
            notes: row.notes,
            special_requests: row.special_requests,
            contact: row.contact,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Reservation store backed by SQLite.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("frontdesk.db")).await?;
/// let store = db.reservations();
///
/// let confirmed = store
///     .list(&ReservationFilter::by_status(ReservationStatus::Confirmed))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteReservationStore {
    pool: SqlitePool,
    defaults: BillingDefaults,
}

impl SqliteReservationStore {
    /// Creates a store with default billing rates.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteReservationStore::with_defaults(pool, BillingDefaults::default())
    }

    pub fn with_defaults(pool: SqlitePool, defaults: BillingDefaults) -> Self {
        SqliteReservationStore { pool, defaults }
    }

    /// Number of stored reservations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts the embedded seed dataset when the table is empty.
    ///
    /// ## Returns
    /// Number of reservations inserted (0 when data already exists).
    pub async fn seed_if_empty(&self) -> DbResult<usize> {
        let existing = self.count().await?;
        if existing > 0 {
            debug!(existing, "Reservations present, skipping seed");
            return Ok(0);
        }

        let seed = seed_reservations(&self.defaults)?;
        let mut tx = self.pool.begin().await?;
        for reservation in &seed {
            insert_row(&mut tx, reservation).await?;
        }
        tx.commit().await?;

        debug!(count = seed.len(), "Seed dataset inserted");
        Ok(seed.len())
    }

    /// Loads, modifies and writes back one reservation in a transaction.
    async fn modify<F>(&self, id: i64, f: F) -> DbResult<Reservation>
    where
        F: FnOnce(&mut Reservation) -> DbResult<()> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let mut reservation = match row {
            Some(row) => Reservation::try_from(row)?,
            None => return Err(DbError::reservation_not_found(id)),
        };

        // Dropping tx on error rolls back
        f(&mut reservation)?;

        update_row(&mut tx, &reservation).await?;
        tx.commit().await?;

        Ok(reservation)
    }
}

async fn insert_row(tx: &mut Transaction<'_, Sqlite>, r: &Reservation) -> DbResult<i64> {
    let discount = serde_json::to_string(&r.discount)?;
    let services = serde_json::to_string(&r.additional_services)?;
    let now = Utc::now();

    let result: SqliteQueryResult = sqlx::query(
        r#"
        INSERT INTO reservations (
            reservation_id, guest_id, room_id, guest_name, room_number,
            check_in_date, check_out_date, adults, children, number_of_nights,
            price_per_night_cents, tax_rate_bps, service_charge_rate_bps,
            discount, additional_services,
            base_amount_cents, tax_amount_cents, service_charge_amount_cents,
            discount_amount_cents, grand_total_cents, total_amount_cents,
            status, payment_status, notes, special_requests, contact,
            created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13,
            ?14, ?15,
            ?16, ?17, ?18,
            ?19, ?20, ?21,
            ?22, ?23, ?24, ?25, ?26,
            ?27, ?28
        )
        "#,
    )
    .bind(&r.reservation_id)
    .bind(r.guest_id)
    .bind(r.room_id)
    .bind(&r.guest_name)
    .bind(&r.room_number)
    .bind(r.check_in_date)
    .bind(r.check_out_date)
    .bind(i64::from(r.adults))
    .bind(i64::from(r.children))
    .bind(r.number_of_nights)
    .bind(r.price_per_night_cents)
    .bind(i64::from(r.tax_rate_bps))
    .bind(i64::from(r.service_charge_rate_bps))
    .bind(discount)
    .bind(services)
    .bind(r.base_amount_cents)
    .bind(r.tax_amount_cents)
    .bind(r.service_charge_amount_cents)
    .bind(r.discount_amount_cents)
    .bind(r.grand_total_cents)
    .bind(r.total_amount_cents)
    .bind(r.status)
    .bind(r.payment_status)
    .bind(&r.notes)
    .bind(&r.special_requests)
    .bind(&r.contact)
    .bind(r.created_at)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn update_row(tx: &mut Transaction<'_, Sqlite>, r: &Reservation) -> DbResult<()> {
    let discount = serde_json::to_string(&r.discount)?;
    let services = serde_json::to_string(&r.additional_services)?;
    let now = Utc::now();

    let result: SqliteQueryResult = sqlx::query(
        r#"
        UPDATE reservations SET
            guest_id = ?2,
            room_id = ?3,
            guest_name = ?4,
            room_number = ?5,
            check_in_date = ?6,
            check_out_date = ?7,
            adults = ?8,
            children = ?9,
            number_of_nights = ?10,
            price_per_night_cents = ?11,
            tax_rate_bps = ?12,
            service_charge_rate_bps = ?13,
            discount = ?14,
            additional_services = ?15,
            base_amount_cents = ?16,
            tax_amount_cents = ?17,
            service_charge_amount_cents = ?18,
            discount_amount_cents = ?19,
            grand_total_cents = ?20,
            total_amount_cents = ?21,
            status = ?22,
            payment_status = ?23,
            notes = ?24,
            special_requests = ?25,
            contact = ?26,
            updated_at = ?27
        WHERE id = ?1
        "#,
    )
    .bind(r.id)
    .bind(r.guest_id)
    .bind(r.room_id)
    .bind(&r.guest_name)
    .bind(&r.room_number)
    .bind(r.check_in_date)
    .bind(r.check_out_date)
    .bind(i64::from(r.adults))
    .bind(i64::from(r.children))
    .bind(r.number_of_nights)
    .bind(r.price_per_night_cents)
    .bind(i64::from(r.tax_rate_bps))
    .bind(i64::from(r.service_charge_rate_bps))
    .bind(discount)
    .bind(services)
    .bind(r.base_amount_cents)
    .bind(r.tax_amount_cents)
    .bind(r.service_charge_amount_cents)
    .bind(r.discount_amount_cents)
    .bind(r.grand_total_cents)
    .bind(r.total_amount_cents)
    .bind(r.status)
    .bind(r.payment_status)
    .bind(&r.notes)
    .bind(&r.special_requests)
    .bind(&r.contact)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::reservation_not_found(r.id));
    }

    Ok(())
}

#[async_trait]
impl ReservationStore for SqliteReservationStore {
    async fn get_all(&self) -> DbResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn list(&self, filter: &ReservationFilter) -> DbResult<Vec<Reservation>> {
        let filter = filter.normalized()?;

        // Status narrows in SQL; the text search runs in Rust to share
        // case-folding rules with the in-memory store
        let rows: Vec<ReservationRow> = match filter.status {
            Some(status) => {
                sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE status = ?1 ORDER BY id"))
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut reservations = Vec::with_capacity(rows.len());
        for row in rows {
            let reservation = Reservation::try_from(row)?;
            if filter.matches(&reservation) {
                reservations.push(reservation);
            }
        }
        Ok(reservations)
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Reservation> {
        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Reservation::try_from(row),
            None => Err(DbError::reservation_not_found(id)),
        }
    }

    async fn create(&self, new: NewReservation) -> DbResult<Reservation> {
        let mut reservation = Reservation::draft(new, &self.defaults, Utc::now())?;

        let mut tx = self.pool.begin().await?;
        reservation.id = insert_row(&mut tx, &reservation).await?;
        tx.commit().await?;

        debug!(
            id = reservation.id,
            reservation_id = %reservation.reservation_id,
            grand_total = %reservation.grand_total(),
            "Reservation created"
        );
        Ok(reservation)
    }

    async fn update(&self, id: i64, patch: ReservationPatch) -> DbResult<Reservation> {
        let updated = self
            .modify(id, |r| r.apply_patch(patch).map_err(DbError::from))
            .await?;
        debug!(id, grand_total = %updated.grand_total(), "Reservation updated");
        Ok(updated)
    }

    async fn update_payment(&self, id: i64, payment_status: PaymentStatus) -> DbResult<Reservation> {
        let updated = self
            .modify(id, |r| {
                r.payment_status = payment_status;
                Ok(())
            })
            .await?;
        debug!(id, ?payment_status, "Payment status updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> DbResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let reservation = match row {
            Some(row) => Reservation::try_from(row)?,
            None => return Err(DbError::reservation_not_found(id)),
        };

        sqlx::query("DELETE FROM reservations WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(id, reservation_id = %reservation.reservation_id, "Reservation deleted");
        Ok(reservation)
    }

    async fn check_in(&self, id: i64) -> DbResult<Reservation> {
        let updated = self
            .modify(id, |r| r.check_in().map_err(DbError::from))
            .await?;
        debug!(id, "Guest checked in");
        Ok(updated)
    }

    async fn check_out(&self, id: i64) -> DbResult<Reservation> {
        let updated = self
            .modify(id, |r| r.check_out().map_err(DbError::from))
            .await?;
        debug!(id, "Guest checked out");
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
