//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

const MENU_ITEM_SELECT: &str = "SELECT id, name, description, category, unit_price, image_url, \
     is_available, created_at, updated_at FROM menu_items";

/// List catalog items, optionally filtered by category and availability.
pub async fn find_all(
    pool: &SqlitePool,
    category: Option<&str>,
    available: Option<bool>,
) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "{MENU_ITEM_SELECT} WHERE (?1 IS NULL OR category = ?1) \
         AND (?2 IS NULL OR is_available = ?2) ORDER BY category, name"
    );
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(category)
        .bind(available)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{MENU_ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Resolve the requested items for a booking in one query.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{MENU_ITEM_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, MenuItem>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn list_categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT category FROM menu_items ORDER BY category")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &MenuItemCreate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO menu_items (id, name, description, category, unit_price, image_url, \
         is_available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.category)
    .bind(data.unit_price)
    .bind(&data.image_url)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Apply a typed patch; absent fields keep their current value.
pub async fn update(pool: &SqlitePool, id: i64, patch: &MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_items SET name = COALESCE(?1, name), \
         description = COALESCE(?2, description), category = COALESCE(?3, category), \
         unit_price = COALESCE(?4, unit_price), image_url = COALESCE(?5, image_url), \
         is_available = COALESCE(?6, is_available), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(&patch.category)
    .bind(patch.unit_price)
    .bind(&patch.image_url)
    .bind(patch.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id}")))
}

/// Delete a catalog item. Refused while any booking line references it —
/// bookings keep their price snapshots but the referential link must stay
/// intact.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let references: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_items WHERE menu_item_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if references > 0 {
        return Err(RepoError::Referenced(format!(
            "Menu item {id} is referenced by {references} booking line(s)"
        )));
    }

    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
