//! Authentication Handlers
//!
//! Handles login, registration, logout and profile management

use std::time::Duration;

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::client::{LoginRequest, LoginResponse, PasswordChangeRequest, UserInfo};
use shared::models::{UserCreate, UserProfileUpdate, UserRole};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - 登录
///
/// Authenticates the credentials and returns a JWT token. Unknown email,
/// disabled account and wrong password all produce the same 401 to
/// prevent account enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_email(&state.pool, &req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let found = match found {
        Some(u) => u,
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !found.is_active {
        tracing::warn!(email = %req.email, "Login failed - account disabled");
        return Err(AppError::invalid_credentials());
    }

    if !password::verify_password(&req.password, &found.password_hash)? {
        tracing::warn!(email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(found.id, &found.username, found.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = found.id,
        username = %found.username,
        role = %found.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&found),
    }))
}

/// POST /api/auth/register - 注册新客户账户
///
/// Public registration always creates `customer` accounts; administrators
/// are provisioned at startup.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    validate_required_text(&req.username, "username", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_required_text(&req.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let password_hash = password::hash_password(&req.password)?;
    let created = user::create(&state.pool, &req, &password_hash, UserRole::Customer).await?;

    let token = state
        .get_jwt_service()
        .generate_token(created.id, &created.username, created.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = created.id,
        username = %created.username,
        "New customer registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserInfo::from(&created),
        }),
    ))
}

/// GET /api/auth/me - 当前用户信息
///
/// Reads fresh account data from the store rather than trusting stale
/// token claims.
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let found = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(UserInfo::from(&found)))
}

/// POST /api/auth/logout - 登出
///
/// Logs the event only. There is no server-side revocation list; issued
/// tokens stay valid until they expire.
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<()>> {
    tracing::info!(
        user_id = current_user.id,
        username = %current_user.username,
        "User logged out"
    );
    Ok(Json(()))
}

/// PUT /api/auth/profile - 更新资料
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(patch): Json<UserProfileUpdate>,
) -> AppResult<Json<UserInfo>> {
    validate_optional_text(&patch.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&patch.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&patch.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let updated = user::update_profile(&state.pool, current_user.id, &patch).await?;
    Ok(Json(UserInfo::from(&updated)))
}

/// POST /api/auth/password - 修改密码
///
/// Requires the current password before accepting the new one.
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<PasswordChangeRequest>,
) -> AppResult<Json<()>> {
    let found = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;

    if !password::verify_password(&req.current_password, &found.password_hash)? {
        return Err(AppError::invalid_credentials());
    }
    validate_password(&req.new_password)?;

    let new_hash = password::hash_password(&req.new_password)?;
    user::update_password(&state.pool, current_user.id, &new_hash).await?;

    tracing::info!(user_id = current_user.id, "Password changed");
    Ok(Json(()))
}
