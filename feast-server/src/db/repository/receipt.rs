//! Receipt Repository
//!
//! Receipt numbers are allocated as `MAX(receipt_number) + 1` inside the
//! insert transaction; SQLite's single-writer lock serializes concurrent
//! generations and the UNIQUE column backstops the allocation.

use super::{RepoError, RepoResult, map_unique_violation};
use shared::models::{PaymentStatus, Receipt, ReceiptDetail};
use sqlx::SqlitePool;

const RECEIPT_SELECT: &str = "SELECT id, receipt_code, receipt_number, booking_id, subtotal, \
     tax_rate, tax_amount, total_amount, payment_method, payment_status, issued_date, \
     created_at, updated_at FROM receipts";

const RECEIPT_DETAIL_SELECT: &str = "SELECT r.id, r.receipt_code, r.receipt_number, \
     r.booking_id, r.subtotal, r.tax_rate, r.tax_amount, r.total_amount, r.payment_method, \
     r.payment_status, r.issued_date, r.created_at, r.updated_at, b.booking_code, \
     u.first_name || ' ' || u.last_name AS customer_name, u.email AS customer_email, \
     u.phone AS customer_phone, b.event_type, b.event_date, b.event_venue, b.guest_count \
     FROM receipts r \
     JOIN bookings b ON r.booking_id = b.id \
     JOIN users u ON b.user_id = u.id";

/// Receipt fields as computed by the generator, ready to persist.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub booking_id: i64,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
}

/// Insert a receipt, allocating the next sequential number in the same
/// transaction. A second receipt for the same booking violates the UNIQUE
/// `booking_id` column and maps to [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, data: &NewReceipt) -> RepoResult<Receipt> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let receipt_code = shared::util::display_code("RCP");

    let mut tx = pool.begin().await?;

    let next_number: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(receipt_number), 0) + 1 FROM receipts")
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query(
        "INSERT INTO receipts (id, receipt_code, receipt_number, booking_id, subtotal, \
         tax_rate, tax_amount, total_amount, payment_method, payment_status, issued_date, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&receipt_code)
    .bind(next_number)
    .bind(data.booking_id)
    .bind(data.subtotal)
    .bind(data.tax_rate)
    .bind(data.tax_amount)
    .bind(data.total_amount)
    .bind(&data.payment_method)
    .bind(data.payment_status)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            &format!("Booking {} already has a receipt", data.booking_id),
        )
    })?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create receipt".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Receipt>> {
    let sql = format!("{RECEIPT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Receipt>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Receipt with denormalized customer and event fields.
pub async fn find_detail_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ReceiptDetail>> {
    let sql = format!("{RECEIPT_DETAIL_SELECT} WHERE r.id = ?");
    let row = sqlx::query_as::<_, ReceiptDetail>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All receipts belonging to one customer's bookings, newest first.
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<ReceiptDetail>> {
    let sql = format!("{RECEIPT_DETAIL_SELECT} WHERE b.user_id = ? ORDER BY r.issued_date DESC");
    let rows = sqlx::query_as::<_, ReceiptDetail>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All receipts (admin view), newest first.
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ReceiptDetail>> {
    let sql = format!("{RECEIPT_DETAIL_SELECT} ORDER BY r.issued_date DESC");
    let rows = sqlx::query_as::<_, ReceiptDetail>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Unconditional payment-status overwrite; no transition graph is
/// enforced here.
pub async fn update_payment_status(
    pool: &SqlitePool,
    id: i64,
    status: PaymentStatus,
) -> RepoResult<Receipt> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE receipts SET payment_status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Receipt {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Receipt {id}")))
}
