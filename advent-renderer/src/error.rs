//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer configuration rejected.
    #[error("Invalid renderer configuration: {0}")]
    InvalidConfig(String),

    /// Writing markup failed.
    #[error("Failed to format markup: {0}")]
    Format(#[from] std::fmt::Error),

    /// The output surface is unavailable (missing mount element, no window).
    #[error("Surface error: {0}")]
    Surface(String),
}
