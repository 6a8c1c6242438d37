//! Receipt API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{booking, receipt};
use crate::receipts;
use crate::utils::AppResult;
use shared::models::{PaymentStatusUpdate, Receipt, ReceiptDetail, ReceiptGenerate};

/// GET /api/receipts - 列出收据
///
/// Customers see receipts of their own bookings; admins see everything.
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ReceiptDetail>>> {
    let items = if current_user.is_admin() {
        receipt::find_all(&state.pool).await?
    } else {
        receipt::find_by_user(&state.pool, current_user.id).await?
    };
    Ok(Json(items))
}

/// POST /api/receipts/generate - 生成收据
pub async fn generate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ReceiptGenerate>,
) -> AppResult<(StatusCode, Json<ReceiptDetail>)> {
    let created = receipts::generate(&state.pool, &current_user, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/receipts/{id} - 获取收据（含客户/活动冗余字段）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReceiptDetail>> {
    let detail = receipts::get_receipt_for(&state.pool, &current_user, id).await?;
    Ok(Json(detail))
}

/// GET /api/receipts/{id}/html - 可打印收据页面
pub async fn get_html(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let detail = receipts::get_receipt_for(&state.pool, &current_user, id).await?;
    let lines = booking::find_lines(&state.pool, detail.booking_id).await?;
    let html = receipts::render::render_html(&detail, &lines);
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response())
}

/// PATCH /api/receipts/{id}/payment-status - 覆写支付状态
pub async fn update_payment_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentStatusUpdate>,
) -> AppResult<Json<Receipt>> {
    let updated =
        receipts::update_payment_status(&state.pool, &current_user, id, payload.status).await?;
    Ok(Json(updated))
}
