//! Editor host error types.

use advent_core::EditorError;
use advent_renderer::RenderError;
use advent_storage::StorageError;
use thiserror::Error;

/// Result type for editor host operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the editor host.
#[derive(Debug, Error)]
pub enum AppError {
    /// An editing operation was rejected.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Painting failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Saving or loading failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A configuration value could not be used.
    #[error("invalid configuration: {key}={value:?}: {reason}")]
    Config {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
}
