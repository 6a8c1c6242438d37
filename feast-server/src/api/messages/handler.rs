//! Message Inbox API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::message;
use crate::utils::validation::{
    MAX_BODY_LEN, MAX_SUBJECT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Message, MessageCreate, MessageRespond, MessageStatus, MessageStatusUpdate, MessageWithSender,
};

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub status: Option<MessageStatus>,
}

/// POST /api/messages - 发送消息给管理员
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MessageCreate>,
) -> AppResult<(StatusCode, Json<Message>)> {
    validate_required_text(&payload.subject, "subject", MAX_SUBJECT_LEN)?;
    validate_required_text(&payload.message_content, "message_content", MAX_BODY_LEN)?;

    let created = message::create(
        &state.pool,
        current_user.id,
        &payload.subject,
        &payload.message_content,
    )
    .await?;

    tracing::info!(
        message_id = created.id,
        user_id = current_user.id,
        "Customer message created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/messages - 自己的消息列表
pub async fn list_own(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = message::find_by_user(&state.pool, current_user.id).await?;
    Ok(Json(messages))
}

/// GET /api/messages/{id} - 获取单条消息
///
/// Customers can only read their own; someone else's message looks like a
/// missing one.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Message>> {
    let found = message::find_by_id(&state.pool, id).await?;
    match found {
        Some(m) if current_user.can_access(m.user_id) => Ok(Json(m)),
        _ => Err(AppError::not_found(format!("Message {id}"))),
    }
}

/// GET /api/messages/all?status= - 管理员收件箱（可按状态过滤）
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<Vec<MessageWithSender>>> {
    let messages = message::find_all(&state.pool, query.status).await?;
    Ok(Json(messages))
}

/// POST /api/messages/{id}/respond - 回复消息（仅管理员）
///
/// Sets the response text and forces the status to `replied`.
pub async fn respond(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MessageRespond>,
) -> AppResult<Json<Message>> {
    validate_required_text(&payload.response, "response", MAX_BODY_LEN)?;

    let updated = message::respond(&state.pool, id, &payload.response).await?;
    tracing::info!(
        message_id = id,
        admin_id = current_user.id,
        "Admin responded to message"
    );
    Ok(Json(updated))
}

/// PATCH /api/messages/{id}/status - 显式状态覆写（仅管理员）
///
/// The normal lifecycle only moves forward; this endpoint is the explicit
/// admin override that may set any state.
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MessageStatusUpdate>,
) -> AppResult<Json<Message>> {
    let updated = message::update_status(&state.pool, id, payload.status).await?;
    tracing::info!(
        message_id = id,
        status = %updated.status,
        admin_id = current_user.id,
        "Message status overridden"
    );
    Ok(Json(updated))
}
