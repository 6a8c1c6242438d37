//! Booking Repository
//!
//! A booking and its lines are written in one transaction: either the
//! booking and every line land, or none do. Date exclusivity is enforced
//! by the partial unique index on `bookings(event_date)`.

use super::{RepoError, RepoResult, map_unique_violation};
use shared::models::{
    Booking, BookingLineDetail, BookingStatus, BookingWithCustomer, BookingWithLines,
};
use sqlx::SqlitePool;

const BOOKING_SELECT: &str = "SELECT id, booking_code, user_id, event_type, event_date, \
     event_venue, guest_count, special_instructions, status, total_amount, created_at, \
     updated_at FROM bookings";

const BOOKING_WITH_CUSTOMER_SELECT: &str = "SELECT b.id, b.booking_code, b.user_id, \
     u.first_name || ' ' || u.last_name AS customer_name, b.event_type, b.event_date, \
     b.event_venue, b.guest_count, b.special_instructions, b.status, b.total_amount, \
     b.created_at, b.updated_at FROM bookings b JOIN users u ON b.user_id = u.id";

const LINE_DETAIL_SELECT: &str = "SELECT bi.id, bi.booking_id, bi.menu_item_id, \
     mi.name AS item_name, mi.category, bi.quantity, bi.unit_price, bi.line_total \
     FROM booking_items bi JOIN menu_items mi ON bi.menu_item_id = mi.id";

/// Booking fields as computed by the workflow, ready to persist.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub event_type: String,
    pub event_date: String,
    pub event_venue: String,
    pub guest_count: i64,
    pub special_instructions: Option<String>,
    pub total_amount: f64,
}

/// Line fields with the price snapshot already taken.
#[derive(Debug, Clone)]
pub struct NewBookingLine {
    pub menu_item_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Insert a booking and all of its lines atomically.
///
/// A unique violation on the event-date index surfaces as
/// [`RepoError::Duplicate`]; the transaction is rolled back and no line
/// rows survive.
pub async fn create(
    pool: &SqlitePool,
    data: &NewBooking,
    lines: &[NewBookingLine],
) -> RepoResult<Booking> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let booking_code = shared::util::display_code("BK");

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO bookings (id, booking_code, user_id, event_type, event_date, event_venue, \
         guest_count, special_instructions, status, total_amount, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?)",
    )
    .bind(id)
    .bind(&booking_code)
    .bind(data.user_id)
    .bind(&data.event_type)
    .bind(&data.event_date)
    .bind(&data.event_venue)
    .bind(data.guest_count)
    .bind(&data.special_instructions)
    .bind(data.total_amount)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            &format!("Event date {} is already booked", data.event_date),
        )
    })?;

    for line in lines {
        sqlx::query(
            "INSERT INTO booking_items (id, booking_id, menu_item_id, quantity, unit_price, \
             line_total) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.line_total)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let sql = format!("{BOOKING_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_lines(pool: &SqlitePool, booking_id: i64) -> RepoResult<Vec<BookingLineDetail>> {
    let sql = format!("{LINE_DETAIL_SELECT} WHERE bi.booking_id = ? ORDER BY bi.id");
    let rows = sqlx::query_as::<_, BookingLineDetail>(&sql)
        .bind(booking_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_with_lines(pool: &SqlitePool, id: i64) -> RepoResult<Option<BookingWithLines>> {
    let Some(booking) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let lines = find_lines(pool, id).await?;
    Ok(Some(BookingWithLines { booking, lines }))
}

/// Page through one user's bookings, newest first.
pub async fn find_by_user_paged(
    pool: &SqlitePool,
    user_id: i64,
    page: i64,
    page_size: i64,
) -> RepoResult<(Vec<BookingWithCustomer>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    let sql = format!(
        "{BOOKING_WITH_CUSTOMER_SELECT} WHERE b.user_id = ? \
         ORDER BY b.created_at DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, BookingWithCustomer>(&sql)
        .bind(user_id)
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(pool)
        .await?;
    Ok((rows, total))
}

/// Page through all bookings (admin view), newest first.
pub async fn find_all_paged(
    pool: &SqlitePool,
    page: i64,
    page_size: i64,
) -> RepoResult<(Vec<BookingWithCustomer>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await?;
    let sql =
        format!("{BOOKING_WITH_CUSTOMER_SELECT} ORDER BY b.created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, BookingWithCustomer>(&sql)
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(pool)
        .await?;
    Ok((rows, total))
}

/// Set a booking's status.
///
/// Re-activating a cancelled booking re-enters the event-date index; a
/// violation there means another booking took the date in the meantime.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: BookingStatus,
) -> RepoResult<Booking> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_unique_violation(e, "Event date is already booked by another event"))?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking {id}")))
}

/// Delete a booking and its lines.
///
/// Lines go first; the stores the original ran on had no cascading
/// deletes and this one keeps the same ordering contract. A booking with
/// an issued receipt is refused outright.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let receipts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE booking_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if receipts > 0 {
        return Err(RepoError::Referenced(format!(
            "Booking {id} has an issued receipt"
        )));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM booking_items WHERE booking_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
