//! Admin Dashboard API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/dashboard", get(handler::get_dashboard))
        .layer(middleware::from_fn(require_admin))
}
