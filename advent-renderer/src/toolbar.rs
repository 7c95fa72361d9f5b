//! Toolbar view for the selected item.

use advent_core::{ItemId, Scene, ToolbarControl, ToolbarState, FONT_FAMILIES};
use serde::Serialize;

use crate::view::Rect;

/// Toolbar height in pixels.
pub const TOOLBAR_HEIGHT: f32 = 44.0;

/// Width of one button slot.
const BUTTON_WIDTH: f32 = 36.0;

/// Width of the font picker.
const FONT_PICKER_WIDTH: f32 = 150.0;

/// Horizontal padding inside the toolbar.
const PADDING: f32 = 8.0;

/// One control as painted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlView {
    /// Which control.
    pub control: ToolbarControl,
    /// Tooltip.
    pub title: &'static str,
    /// Whether a toggle is on.
    pub active: bool,
    /// Current value of pickers.
    pub value: Option<String>,
}

/// Painted toolbar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarView {
    /// Item the toolbar edits.
    pub item: ItemId,
    /// Hit zone; presses here never reach the canvas.
    pub bounds: Rect,
    /// Controls in display order.
    pub controls: Vec<ControlView>,
    /// Options of the font picker as `(value, label)`.
    pub fonts: Vec<(&'static str, &'static str)>,
}

impl ToolbarView {
    /// Toolbar for the current selection.
    #[must_use]
    pub fn for_scene(scene: &Scene) -> Option<Self> {
        ToolbarState::for_scene(scene).map(|state| Self::from_state(&state))
    }

    /// Lay out a toolbar state.
    #[must_use]
    pub fn from_state(state: &ToolbarState) -> Self {
        let controls: Vec<ControlView> = state
            .controls
            .iter()
            .map(|&control| ControlView {
                control,
                title: title(control),
                active: match control {
                    ToolbarControl::Bold => state.bold,
                    ToolbarControl::Italic => state.italic,
                    _ => false,
                },
                value: match control {
                    ToolbarControl::FontFamily => state.font_family.clone(),
                    ToolbarControl::Color => state.color.clone(),
                    ToolbarControl::BackgroundColor => state.background_color.clone(),
                    _ => None,
                },
            })
            .collect();

        let width = controls.iter().fold(2.0 * PADDING, |acc, c| {
            acc + if c.control == ToolbarControl::FontFamily {
                FONT_PICKER_WIDTH
            } else {
                BUTTON_WIDTH
            }
        });
        let fonts = if state.offers(ToolbarControl::FontFamily) {
            FONT_FAMILIES.iter().map(|f| (f.value, f.label)).collect()
        } else {
            Vec::new()
        };

        Self {
            item: state.item,
            bounds: Rect::new(state.anchor.x, state.anchor.y, width, TOOLBAR_HEIGHT),
            controls,
            fonts,
        }
    }
}

/// Tooltip shown for a control.
#[must_use]
pub const fn title(control: ToolbarControl) -> &'static str {
    match control {
        ToolbarControl::FontFamily => "Font",
        ToolbarControl::Color => "Text Color",
        ToolbarControl::Bold => "Bold",
        ToolbarControl::Italic => "Italic",
        ToolbarControl::BackgroundColor => "Button Color",
        ToolbarControl::BringToFront => "Bring to Front",
        ToolbarControl::SendToBack => "Send to Back",
        ToolbarControl::Delete => "Delete",
        ToolbarControl::Close => "Close",
    }
}
