//! Rendering backend implementations.

pub mod html;
#[cfg(feature = "wasm")]
pub mod dom;

use crate::view::Frame;
use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Paint a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, frame: &Frame) -> RenderResult<()>;

    /// Markup of the last rendered frame, for backends that produce text.
    fn markup(&self) -> Option<&str> {
        None
    }
}
