//! Dashboard Statistics Repository
//!
//! Read-only aggregates over the other tables. Each query is independent
//! so the dashboard handler can fan them out concurrently and degrade
//! per-statistic on failure.

use super::RepoResult;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Grouping granularity for the revenue breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenuePeriod {
    Day,
    Week,
    Month,
    Year,
}

impl RevenuePeriod {
    /// strftime pattern used as the GROUP BY key
    fn format(&self) -> &'static str {
        match self {
            RevenuePeriod::Day => "%Y-%m-%d",
            RevenuePeriod::Week => "%Y-W%W",
            RevenuePeriod::Month => "%Y-%m",
            RevenuePeriod::Year => "%Y",
        }
    }
}

/// Revenue aggregated over one period bucket
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevenuePoint {
    pub period: String,
    pub revenue: f64,
    pub receipts: i64,
}

/// Most-recent booking row for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentBooking {
    pub id: i64,
    pub booking_code: String,
    pub customer_name: String,
    pub event_type: String,
    pub event_date: String,
    pub status: String,
    pub total_amount: f64,
    pub created_at: i64,
}

pub async fn count_active_users(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_bookings(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_pending_bookings(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = 'pending'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Total and available menu item counts in one pass.
pub async fn count_menu_items(pool: &SqlitePool) -> RepoResult<(i64, i64)> {
    let row: (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_available = 1 THEN 1 ELSE 0 END), 0) \
         FROM menu_items",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Revenue counts only receipts that were actually paid.
pub async fn total_paid_revenue(pool: &SqlitePool) -> RepoResult<f64> {
    let revenue = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0.0) FROM receipts WHERE payment_status = 'paid'",
    )
    .fetch_one(pool)
    .await?;
    Ok(revenue)
}

pub async fn count_unread_messages(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM admin_messages WHERE status = 'unread'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn recent_bookings(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<RecentBooking>> {
    let rows = sqlx::query_as::<_, RecentBooking>(
        "SELECT b.id, b.booking_code, u.first_name || ' ' || u.last_name AS customer_name, \
         b.event_type, b.event_date, b.status, b.total_amount, b.created_at \
         FROM bookings b JOIN users u ON b.user_id = u.id \
         ORDER BY b.created_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Paid revenue grouped by calendar period of the issue date.
pub async fn revenue_by_period(
    pool: &SqlitePool,
    period: RevenuePeriod,
) -> RepoResult<Vec<RevenuePoint>> {
    let sql = format!(
        "SELECT strftime('{}', datetime(issued_date / 1000, 'unixepoch')) AS period, \
         COALESCE(SUM(total_amount), 0.0) AS revenue, COUNT(*) AS receipts \
         FROM receipts WHERE payment_status = 'paid' \
         GROUP BY period ORDER BY period",
        period.format()
    );
    let rows = sqlx::query_as::<_, RevenuePoint>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
