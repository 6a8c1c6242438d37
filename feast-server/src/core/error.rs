//! Server-level errors (startup and serving)

use crate::utils::AppError;
use thiserror::Error;

/// 服务器错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Application error: {0}")]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
