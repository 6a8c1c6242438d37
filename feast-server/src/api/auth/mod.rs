//! Authentication Routes

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/register: public (no auth required)
/// - the rest: protected by the global require_auth middleware
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - no auth middleware applied
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register))
        // Protected routes - require authentication
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/profile", put(handler::update_profile))
        .route("/api/auth/password", post(handler::change_password))
}
