//! Booking API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::bookings;
use crate::core::ServerState;
use crate::db::repository::booking;
use crate::utils::AppResult;
use shared::client::Paginated;
use shared::models::{
    Booking, BookingCreate, BookingStatusUpdate, BookingWithCustomer, BookingWithLines,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl PageQuery {
    fn clamp(&self) -> (i64, i64) {
        (self.page.max(1), self.page_size.clamp(1, 100))
    }
}

/// GET /api/bookings - 列出预订
///
/// Customers see their own bookings; admins see everything.
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<BookingWithCustomer>>> {
    let (page, page_size) = query.clamp();
    let (items, total) = if current_user.is_admin() {
        booking::find_all_paged(&state.pool, page, page_size).await?
    } else {
        booking::find_by_user_paged(&state.pool, current_user.id, page, page_size).await?
    };
    Ok(Json(Paginated::new(items, total, page, page_size)))
}

/// POST /api/bookings - 创建预订
///
/// 201 with the booking and resolved lines; 409 when the event date is
/// already taken by a non-cancelled booking.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<(StatusCode, Json<BookingWithLines>)> {
    let created = bookings::create_booking(&state.pool, current_user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/bookings/{id} - 获取单个预订（含明细行）
///
/// Cross-user access looks identical to a missing booking.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingWithLines>> {
    let found = bookings::get_booking_for(&state.pool, &current_user, id).await?;
    Ok(Json(found))
}

/// PATCH /api/bookings/{id}/status - 状态变更
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    let updated =
        bookings::update_status(&state.pool, &current_user, id, payload.status).await?;
    Ok(Json(updated))
}

/// DELETE /api/bookings/{id} - 删除预订（先删行，后删预订）
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = bookings::delete_booking(&state.pool, &current_user, id).await?;
    Ok(Json(deleted))
}
