//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity (purchasable catalog entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub unit_price: f64,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload (admin only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub unit_price: f64,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// Typed menu item patch: only the present fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<f64>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}
