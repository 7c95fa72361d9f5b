//! Pointer input for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// Sequence aborted (pointer capture lost, window blur).
    Cancel,
}

/// What the pointer landed on, as resolved by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HitTarget {
    /// Empty canvas background.
    Canvas,
    /// Move surface covering an item's body.
    Item(ItemId),
    /// Bottom-right resize handle of the selected item.
    ResizeHandle(ItemId),
    /// Inline editor of a text item.
    TextField(ItemId),
    /// The contextual toolbar.
    Toolbar,
}

impl HitTarget {
    /// Item under the pointer, if any.
    #[must_use]
    pub const fn item(self) -> Option<ItemId> {
        match self {
            Self::Item(id) | Self::ResizeHandle(id) | Self::TextField(id) => Some(id),
            Self::Canvas | Self::Toolbar => None,
        }
    }
}

/// A single pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Pointer identifier (mouse is usually 1, touches get their own).
    pub pointer_id: u32,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Hit-test result for `Down` events. Ignored for other phases.
    pub target: HitTarget,
}

impl PointerEvent {
    /// Create a pointer event over the empty canvas.
    #[must_use]
    pub const fn new(phase: PointerPhase, pointer_id: u32, x: f32, y: f32) -> Self {
        Self {
            phase,
            pointer_id,
            x,
            y,
            target: HitTarget::Canvas,
        }
    }

    /// Pointer-down helper.
    #[must_use]
    pub const fn down(pointer_id: u32, x: f32, y: f32, target: HitTarget) -> Self {
        Self::new(PointerPhase::Down, pointer_id, x, y).with_target(target)
    }

    /// Pointer-move helper.
    #[must_use]
    pub const fn moved(pointer_id: u32, x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, pointer_id, x, y)
    }

    /// Pointer-up helper.
    #[must_use]
    pub const fn up(pointer_id: u32, x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, pointer_id, x, y)
    }

    /// Pointer-cancel helper.
    #[must_use]
    pub const fn cancel(pointer_id: u32) -> Self {
        Self::new(PointerPhase::Cancel, pointer_id, 0.0, 0.0)
    }

    /// Set the hit target.
    #[must_use]
    pub const fn with_target(mut self, target: HitTarget) -> Self {
        self.target = target;
        self
    }

    /// Pointer position as a tuple.
    #[must_use]
    pub const fn point(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
