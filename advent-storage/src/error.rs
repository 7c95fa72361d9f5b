//! Storage error types.

use advent_core::EditorError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while persisting calendars.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Required configuration is missing.
    #[error("storage not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The storage base URL is invalid.
    #[error("invalid storage URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("storage HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error("storage returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as sent.
        body: String,
    },

    /// JSON encoding or decoding failed.
    #[error("failed to encode storage payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Day outside 1..=24.
    #[error("invalid day {0}: expected 1..=24")]
    InvalidDay(u8),

    /// Calendar token with characters outside `[A-Za-z0-9_-]`.
    #[error("invalid calendar token: {0:?}")]
    InvalidToken(String),

    /// Object name that would escape its folder.
    #[error("invalid object name: {0:?}")]
    InvalidName(String),

    /// Scene document could not be produced.
    #[error(transparent)]
    Document(#[from] EditorError),
}
