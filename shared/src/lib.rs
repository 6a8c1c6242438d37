//! Shared types for the Feast catering platform
//!
//! Common types used by the server and API clients: data models,
//! request/response DTOs and ID/timestamp utilities.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
