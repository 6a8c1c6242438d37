//! Admin Dashboard Handlers
//!
//! Pure aggregation over the other tables. The sub-queries are
//! independent reads: they are fanned out concurrently and joined once
//! all complete, and each one degrades to a zero/empty default on error —
//! one failed statistic must not abort the whole dashboard response.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::stats::{self, RecentBooking, RevenuePeriod, RevenuePoint};
use crate::utils::AppResult;

/// Number of most-recent bookings shown on the dashboard
const RECENT_BOOKINGS_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub period: Option<RevenuePeriod>,
}

/// Aggregate counters
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatistics {
    pub active_users: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub menu_items_total: i64,
    pub menu_items_available: i64,
    pub total_revenue: f64,
    pub unread_messages: i64,
}

/// Full dashboard response
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub statistics: DashboardStatistics,
    pub recent_bookings: Vec<RecentBooking>,
    pub revenue_by_period: Vec<RevenuePoint>,
}

/// Log the failure and fall back to the default for one statistic.
fn or_default<T: Default>(name: &str, result: Result<T, crate::db::repository::RepoError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(statistic = name, error = %e, "Dashboard statistic failed, using default");
            T::default()
        }
    }
}

/// GET /api/admin/dashboard - 统计面板（仅管理员）
pub async fn get_dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let pool = &state.pool;
    let period = query.period.unwrap_or(RevenuePeriod::Month);

    // Fan out the independent reads; join once every one has resolved.
    let (
        active_users,
        total_bookings,
        pending_bookings,
        menu_counts,
        total_revenue,
        unread_messages,
        recent,
        revenue,
    ) = tokio::join!(
        stats::count_active_users(pool),
        stats::count_bookings(pool),
        stats::count_pending_bookings(pool),
        stats::count_menu_items(pool),
        stats::total_paid_revenue(pool),
        stats::count_unread_messages(pool),
        stats::recent_bookings(pool, RECENT_BOOKINGS_LIMIT),
        stats::revenue_by_period(pool, period),
    );

    let (menu_items_total, menu_items_available) = or_default("menu_items", menu_counts);

    Ok(Json(DashboardResponse {
        statistics: DashboardStatistics {
            active_users: or_default("active_users", active_users),
            total_bookings: or_default("total_bookings", total_bookings),
            pending_bookings: or_default("pending_bookings", pending_bookings),
            menu_items_total,
            menu_items_available,
            total_revenue: or_default("total_revenue", total_revenue),
            unread_messages: or_default("unread_messages", unread_messages),
        },
        recent_bookings: or_default("recent_bookings", recent),
        revenue_by_period: or_default("revenue_by_period", revenue),
    }))
}
