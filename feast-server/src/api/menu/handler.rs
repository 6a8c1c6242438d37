//! Menu Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::bookings::money;
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub available: Option<bool>,
}

/// GET /api/menu - 获取菜单（可按分类/可用性过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items =
        menu_item::find_all(&state.pool, query.category.as_deref(), query.available).await?;
    Ok(Json(items))
}

/// GET /api/menu/categories - 分类列表
pub async fn list_categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let categories = menu_item::list_categories(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/menu/{id} - 获取单个菜单项
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;
    Ok(Json(item))
}

/// POST /api/menu - 创建菜单项（仅管理员）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    money::validate_unit_price(payload.unit_price)?;

    let item = menu_item::create(&state.pool, &payload).await?;
    tracing::info!(menu_item_id = item.id, name = %item.name, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/{id} - 更新菜单项（仅管理员）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(patch): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &patch.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(category) = &patch.category {
        validate_required_text(category, "category", MAX_NAME_LEN)?;
    }
    validate_optional_text(&patch.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&patch.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = patch.unit_price {
        money::validate_unit_price(price)?;
    }

    let item = menu_item::update(&state.pool, id, &patch).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 删除菜单项（仅管理员）
///
/// Refused with 409 while any booking line references the item.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = menu_item::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Menu item {id}")));
    }
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(Json(true))
}
