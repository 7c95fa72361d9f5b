//! Editor configuration.

use advent_core::{AssetCatalog, GestureConfig, DEFAULT_DRAG_THRESHOLD};
use advent_renderer::{RenderMode, RendererConfig, DEFAULT_HANDLE_SIZE};

use crate::{AppError, AppResult};

/// Environment variable overriding the drag threshold.
pub const DRAG_THRESHOLD_VAR: &str = "ADVENT_DRAG_THRESHOLD";

/// Environment variable overriding the resize handle size.
pub const HANDLE_SIZE_VAR: &str = "ADVENT_HANDLE_SIZE";

/// Editor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Pointer travel that turns a press into a drag.
    pub drag_threshold: f32,
    /// Side of the resize handle.
    pub handle_size: f32,
    /// Edit or read-only rendering.
    pub mode: RenderMode,
    /// Preset backgrounds and stickers.
    pub catalog: AssetCatalog,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            handle_size: DEFAULT_HANDLE_SIZE,
            mode: RenderMode::Edit,
            catalog: AssetCatalog::default(),
        }
    }
}

impl EditorConfig {
    /// Configuration for viewing a finished day.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            mode: RenderMode::ReadOnly,
            ..Self::default()
        }
    }

    /// Defaults overridden by `ADVENT_DRAG_THRESHOLD` and `ADVENT_HANDLE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if a variable is set but not a positive number.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EditorConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if a variable is set but not a positive number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(DRAG_THRESHOLD_VAR) {
            config.drag_threshold = positive(DRAG_THRESHOLD_VAR, &value)?;
        }
        if let Some(value) = lookup(HANDLE_SIZE_VAR) {
            config.handle_size = positive(HANDLE_SIZE_VAR, &value)?;
        }
        Ok(config)
    }

    /// Gesture engine settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the drag threshold is not positive.
    pub fn gesture_config(&self) -> AppResult<GestureConfig> {
        Ok(GestureConfig::new(self.drag_threshold)?)
    }

    /// Renderer settings.
    #[must_use]
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            mode: self.mode,
            handle_size: self.handle_size,
            ..RendererConfig::default()
        }
    }
}

fn positive(key: &'static str, value: &str) -> AppResult<f32> {
    let parsed: f32 = value.trim().parse::<f32>().map_err(|e| AppError::Config {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(AppError::Config {
            key,
            value: value.to_string(),
            reason: "must be a positive number".to_string(),
        })
    }
}
