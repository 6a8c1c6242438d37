//! Message Inbox API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/messages", routes())
}

fn routes() -> Router<ServerState> {
    // 客户路由：创建和读取自己的消息
    let customer_routes = Router::new()
        .route("/", get(handler::list_own).post(handler::create))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：收件箱、回复、状态覆写
    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/{id}/respond", post(handler::respond))
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_admin));

    customer_routes.merge(admin_routes)
}
