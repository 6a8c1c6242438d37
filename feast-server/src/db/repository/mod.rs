//! Repository Module
//!
//! CRUD operations over the SQLite tables. Repositories are free functions
//! taking `&SqlitePool`; multi-statement writes run inside one transaction.

// Accounts
pub mod user;

// Catalog
pub mod menu_item;

// Bookings and billing
pub mod booking;
pub mod receipt;

// Inbox
pub mod message;

// Dashboard aggregates
pub mod stats;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Still referenced: {0}")]
    Referenced(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a sqlx error to [`RepoError::Duplicate`] with the given message when
/// it is a unique-constraint violation, falling back to a database error.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Duplicate(message.to_string())
        }
        _ => RepoError::Database(err.to_string()),
    }
}
