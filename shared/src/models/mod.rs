//! Data models
//!
//! Shared between feast-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix
//! milliseconds.

pub mod booking;
pub mod menu_item;
pub mod message;
pub mod receipt;
pub mod user;

// Re-exports
pub use booking::*;
pub use menu_item::*;
pub use message::*;
pub use receipt::*;
pub use user::*;
