//! # Advent Canvas Renderer
//!
//! Turns a scene into a paintable frame and paints it.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │   Scene + drag preview  (advent-core)       │
//! ├─────────────────────────────────────────────┤
//! │   Frame  (paint order, handles, toolbar)    │
//! ├──────────────────────┬──────────────────────┤
//! │   HTML string        │   Browser DOM        │
//! │   (any target)       │   (wasm feature)     │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Hit testing runs against the same [`Frame`] that was painted, so what the
//! user sees is what the pointer hits.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod hit;
pub mod toolbar;
pub mod view;

pub use backend::html::HtmlBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use hit::hit_test;
pub use toolbar::{ControlView, ToolbarView, TOOLBAR_HEIGHT};
pub use view::{Frame, ImageFit, ItemContent, ItemView, Rect, PLACEHOLDER_TEXT};

use advent_core::{DragPreview, Scene};
use serde::{Deserialize, Serialize};

/// Default side of the square resize handle, in pixels.
pub const DEFAULT_HANDLE_SIZE: f32 = 16.0;

/// Default element id the DOM backend mounts on.
pub const DEFAULT_MOUNT_ID: &str = "canvas-area";

/// Whether the canvas is being edited or viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Editor: selection, handles, toolbar, inert links.
    #[default]
    Edit,
    /// Calendar viewer: no editing affordances, links navigate.
    ReadOnly,
}

/// Approximate text measurement for auto-sized text items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance of one character.
    pub char_width: f32,
    /// Height of one line.
    pub line_height: f32,
    /// Padding between the item border and the text field.
    pub padding: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 9.6,
            line_height: 24.0,
            padding: 8.0,
        }
    }
}

impl TextMetrics {
    /// Size of a single-line text item holding `content`, padding included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(&self, content: &str) -> (f32, f32) {
        let chars = content.chars().count().max(1);
        (
            chars as f32 * self.char_width + 2.0 * self.padding,
            self.line_height + 2.0 * self.padding,
        )
    }
}

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Edit or read-only output.
    pub mode: RenderMode,
    /// Side of the resize handle.
    pub handle_size: f32,
    /// Text measurement.
    pub text_metrics: TextMetrics,
    /// Preferred backend (falls back to HTML if unavailable).
    pub preferred_backend: BackendType,
    /// Element id the DOM backend mounts on.
    pub mount_id: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Edit,
            handle_size: DEFAULT_HANDLE_SIZE,
            text_metrics: TextMetrics::default(),
            preferred_backend: BackendType::Html,
            mount_id: DEFAULT_MOUNT_ID.to_string(),
        }
    }
}

impl RendererConfig {
    /// Configuration for the calendar viewer.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            mode: RenderMode::ReadOnly,
            ..Self::default()
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is not a positive finite number.
    pub fn validate(&self) -> RenderResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.handle_size) {
            return Err(RenderError::InvalidConfig(format!(
                "handle size must be positive, got {}",
                self.handle_size
            )));
        }
        let m = &self.text_metrics;
        if !positive(m.char_width)
            || !positive(m.line_height)
            || !m.padding.is_finite()
            || m.padding < 0.0
        {
            return Err(RenderError::InvalidConfig(format!(
                "invalid text metrics {m:?}"
            )));
        }
        Ok(())
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// HTML string output.
    Html,
    /// Live browser DOM (requires the `wasm` feature).
    Dom,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("backend", &self.backend.backend_type())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        config.validate()?;
        let backend = Self::create_backend(&config);
        Ok(Self {
            config,
            backend,
            frame_count: 0,
        })
    }

    /// Create a renderer that paints through `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_backend(
        config: RendererConfig,
        backend: Box<dyn RenderBackend>,
    ) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            frame_count: 0,
        })
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> Box<dyn RenderBackend> {
        match config.preferred_backend {
            BackendType::Dom => {
                #[cfg(feature = "wasm")]
                {
                    match backend::dom::DomBackend::mount(&config.mount_id) {
                        Ok(b) => return Box::new(b),
                        Err(e) => {
                            tracing::warn!("DOM backend unavailable, falling back: {}", e);
                        }
                    }
                }
                #[cfg(not(feature = "wasm"))]
                tracing::warn!("DOM backend needs the wasm feature, falling back to HTML");
                Box::new(HtmlBackend::new())
            }
            BackendType::Html => Box::new(HtmlBackend::new()),
        }
    }

    /// Build the frame for `scene` without painting it.
    #[must_use]
    pub fn frame(&self, scene: &Scene, preview: Option<DragPreview>) -> Frame {
        Frame::build(scene, preview, &self.config)
    }

    /// Build and paint a frame; returns it for hit testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to paint.
    pub fn render(&mut self, scene: &Scene, preview: Option<DragPreview>) -> RenderResult<Frame> {
        let frame = self.frame(scene, preview);
        self.backend.render(&frame)?;
        self.frame_count += 1;
        Ok(frame)
    }

    /// Markup of the last painted frame, if the backend produces text.
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.backend.markup()
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
