//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur in editor operations.
///
/// Every variant is recoverable: the scene is left untouched whenever one of
/// these is returned.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Input rejected at the boundary (empty link URL, unknown font, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Item not found in the scene.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// An item with the same identifier is already part of the scene.
    #[error("Duplicate item: {0}")]
    DuplicateItem(String),

    /// The selected item's toolbar does not offer this control.
    #[error("Control {control} is not available for {kind} items")]
    UnsupportedControl {
        /// Control that was requested.
        control: &'static str,
        /// Item variant the control was applied to.
        kind: &'static str,
    },

    /// Reading an uploaded file failed.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Preset background or sticker is not registered in the asset catalog.
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Scene document was written by an incompatible version.
    #[error("Unsupported scene document version: {0}")]
    UnsupportedVersion(u32),
}
