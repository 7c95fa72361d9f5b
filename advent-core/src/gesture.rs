//! Drag and resize gestures.
//!
//! [`GestureEngine`] turns pointer sequences into [`SceneStore`] mutations.
//! Only one gesture runs at a time; events that do not fit the current state
//! are ignored and reported as [`GestureEffect::Noop`].
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle      (move surface)
//!           \----> Idle                  (click: select, or deselect on canvas)
//! Idle -> Resizing -> Idle               (resize handle of the selected item)
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    EditorError, EditorResult, HitTarget, ItemId, PointerEvent, PointerPhase, Position,
    SceneStore, Size,
};

/// Pointer travel, in canvas pixels, before a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 8.0;

/// Tunables for the gesture engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Distance the pointer must strictly exceed to start a drag.
    pub drag_threshold: f32,
}

impl GestureConfig {
    /// Create a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] unless the threshold is a finite,
    /// positive number.
    pub fn new(drag_threshold: f32) -> EditorResult<Self> {
        if !drag_threshold.is_finite() || drag_threshold <= 0.0 {
            return Err(EditorError::InvalidInput(format!(
                "drag threshold must be positive, got {drag_threshold}"
            )));
        }
        Ok(Self { drag_threshold })
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

/// What a press is armed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "snake_case")]
pub enum ArmedSubject {
    /// An item's move surface.
    Item {
        /// Pressed item.
        id: ItemId,
        /// Item position when the press started.
        item_origin: Position,
    },
    /// Empty canvas; releasing in place deselects.
    Canvas,
}

/// Gesture lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GestureState {
    /// No pointer sequence in progress.
    #[default]
    Idle,
    /// Pointer is down but has not travelled past the threshold.
    Armed {
        /// What was pressed.
        subject: ArmedSubject,
        /// Pointer that owns the sequence.
        pointer_id: u32,
        /// Pointer position at press.
        origin: (f32, f32),
    },
    /// An item is being dragged; the store is untouched until release.
    Dragging {
        /// Dragged item.
        item: ItemId,
        /// Pointer that owns the sequence.
        pointer_id: u32,
        /// Pointer position at press.
        origin: (f32, f32),
        /// Latest pointer position.
        current: (f32, f32),
        /// Item position when the press started.
        item_origin: Position,
    },
    /// The selected item is being resized from its handle.
    Resizing {
        /// Resized item.
        item: ItemId,
        /// Pointer that owns the sequence.
        pointer_id: u32,
        /// Pointer position at press.
        start_pointer: (f32, f32),
        /// Item size at press.
        start_size: Size,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// Move/up/cancel arrived with no gesture in progress.
    IdleWithoutActiveGesture,
    /// A second pointer-down arrived while a gesture was running.
    GestureAlreadyActive,
    /// Event came from a different pointer than the one that started.
    PointerMismatch,
    /// Armed press has not travelled far enough to drag.
    ThresholdNotReached,
    /// Pointer-down on the toolbar; the toolbar owns the pointer.
    ToolbarOwnsPointer,
    /// Resize handle of an item that is not selected or not resizable.
    HandleInactive,
    /// The target item is no longer in the scene.
    ItemMissing,
    /// A canvas press moved too far to count as a click.
    CanvasDragIgnored,
    /// Canvas click with nothing selected.
    NothingSelected,
}

/// Outcome of one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GestureEffect {
    /// Press recorded; waiting for a click or drag.
    Armed {
        /// Pressed item, `None` for the canvas.
        item: Option<ItemId>,
    },
    /// Item selected by a click or a text-field press.
    Selected {
        /// Selected item.
        item: ItemId,
    },
    /// Selection cleared by a canvas click.
    Deselected,
    /// Press crossed the threshold.
    DragStarted {
        /// Dragged item.
        item: ItemId,
        /// Offset from the item origin.
        dx: f32,
        /// Offset from the item origin.
        dy: f32,
    },
    /// Drag moved; preview only, not yet committed.
    DragPreview {
        /// Dragged item.
        item: ItemId,
        /// Offset from the item origin.
        dx: f32,
        /// Offset from the item origin.
        dy: f32,
    },
    /// Drag released; one `move_item` applied.
    DragCommitted {
        /// Moved item.
        item: ItemId,
        /// Final position.
        position: Position,
    },
    /// Drag aborted; the item stays where it was.
    DragCanceled {
        /// Item that was being dragged.
        item: ItemId,
    },
    /// Resize handle grabbed.
    ResizeStarted {
        /// Resized item.
        item: ItemId,
    },
    /// Resize applied to the store.
    Resized {
        /// Resized item.
        item: ItemId,
        /// Size after flooring.
        size: Size,
    },
    /// Resize released or canceled; the last size stays.
    ResizeEnded {
        /// Resized item.
        item: ItemId,
    },
    /// Event ignored.
    Noop {
        /// Why.
        reason: NoopReason,
    },
}

impl GestureEffect {
    /// Whether the host must keep this event away from canvas-level handlers.
    ///
    /// Everything that landed on an item or the toolbar is contained.
    #[must_use]
    pub const fn stops_propagation(&self) -> bool {
        !matches!(
            self,
            Self::Deselected
                | Self::Armed { item: None }
                | Self::Noop {
                    reason: NoopReason::CanvasDragIgnored
                        | NoopReason::NothingSelected
                        | NoopReason::IdleWithoutActiveGesture
                }
        )
    }

    fn noop(reason: NoopReason) -> Self {
        tracing::trace!(?reason, "Gesture event ignored");
        Self::Noop { reason }
    }
}

/// Live drag offset for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    /// Dragged item.
    pub item: ItemId,
    /// Horizontal offset.
    pub dx: f32,
    /// Vertical offset.
    pub dy: f32,
}

/// Pointer state machine driving drag and resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureEngine {
    state: GestureState,
    config: GestureConfig,
}

impl GestureEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            state: GestureState::Idle,
            config,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &GestureState {
        &self.state
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a pointer sequence is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Offset to paint the dragged item at, while dragging.
    #[must_use]
    pub fn drag_preview(&self) -> Option<DragPreview> {
        match self.state {
            GestureState::Dragging {
                item,
                origin,
                current,
                ..
            } => {
                let (dx, dy) = delta(origin, current);
                Some(DragPreview { item, dx, dy })
            }
            _ => None,
        }
    }

    /// Feed one pointer event, applying any resulting mutation to `store`.
    pub fn handle(&mut self, store: &mut SceneStore, event: &PointerEvent) -> GestureEffect {
        let from = self.state;
        let effect = match event.phase {
            PointerPhase::Down => self.pointer_down(store, event),
            PointerPhase::Move => self.pointer_move(store, event),
            PointerPhase::Up => self.pointer_up(store, event),
            PointerPhase::Cancel => self.pointer_cancel(event),
        };
        if from != self.state {
            tracing::trace!(?from, to = ?self.state, "Gesture transition");
        }
        effect
    }

    fn pointer_down(&mut self, store: &mut SceneStore, event: &PointerEvent) -> GestureEffect {
        if self.is_active() {
            return GestureEffect::noop(NoopReason::GestureAlreadyActive);
        }
        let origin = event.point();
        match event.target {
            HitTarget::Toolbar => GestureEffect::noop(NoopReason::ToolbarOwnsPointer),
            HitTarget::Canvas => {
                self.state = GestureState::Armed {
                    subject: ArmedSubject::Canvas,
                    pointer_id: event.pointer_id,
                    origin,
                };
                GestureEffect::Armed { item: None }
            }
            HitTarget::TextField(id) => {
                if !store.scene().contains(id) {
                    return GestureEffect::noop(NoopReason::ItemMissing);
                }
                store.select(Some(id));
                GestureEffect::Selected { item: id }
            }
            HitTarget::Item(id) => {
                let Some(item) = store.scene().get(id) else {
                    return GestureEffect::noop(NoopReason::ItemMissing);
                };
                self.state = GestureState::Armed {
                    subject: ArmedSubject::Item {
                        id,
                        item_origin: item.position,
                    },
                    pointer_id: event.pointer_id,
                    origin,
                };
                GestureEffect::Armed { item: Some(id) }
            }
            HitTarget::ResizeHandle(id) => {
                let scene = store.scene();
                let start_size = scene
                    .get(id)
                    .filter(|_| scene.selected_id() == Some(id))
                    .and_then(|item| item.kind.size());
                let Some(start_size) = start_size else {
                    return GestureEffect::noop(NoopReason::HandleInactive);
                };
                self.state = GestureState::Resizing {
                    item: id,
                    pointer_id: event.pointer_id,
                    start_pointer: origin,
                    start_size,
                };
                GestureEffect::ResizeStarted { item: id }
            }
        }
    }

    fn pointer_move(&mut self, store: &mut SceneStore, event: &PointerEvent) -> GestureEffect {
        let current = event.point();
        match self.state {
            GestureState::Idle => GestureEffect::noop(NoopReason::IdleWithoutActiveGesture),
            GestureState::Armed { pointer_id, .. }
            | GestureState::Dragging { pointer_id, .. }
            | GestureState::Resizing { pointer_id, .. }
                if pointer_id != event.pointer_id =>
            {
                GestureEffect::noop(NoopReason::PointerMismatch)
            }
            GestureState::Armed {
                subject,
                pointer_id,
                origin,
            } => {
                if !crossed_threshold(origin, current, self.config.drag_threshold) {
                    return GestureEffect::noop(NoopReason::ThresholdNotReached);
                }
                match subject {
                    ArmedSubject::Canvas => {
                        self.state = GestureState::Idle;
                        GestureEffect::noop(NoopReason::CanvasDragIgnored)
                    }
                    ArmedSubject::Item { id, item_origin } => {
                        self.state = GestureState::Dragging {
                            item: id,
                            pointer_id,
                            origin,
                            current,
                            item_origin,
                        };
                        let (dx, dy) = delta(origin, current);
                        GestureEffect::DragStarted { item: id, dx, dy }
                    }
                }
            }
            GestureState::Dragging {
                item,
                pointer_id,
                origin,
                item_origin,
                ..
            } => {
                self.state = GestureState::Dragging {
                    item,
                    pointer_id,
                    origin,
                    current,
                    item_origin,
                };
                let (dx, dy) = delta(origin, current);
                GestureEffect::DragPreview { item, dx, dy }
            }
            GestureState::Resizing {
                item,
                start_pointer,
                start_size,
                ..
            } => {
                let (dx, dy) = delta(start_pointer, current);
                store.resize_item(item, start_size.width + dx, start_size.height + dy);
                match store.scene().get(item).and_then(|i| i.kind.size()) {
                    Some(size) => GestureEffect::Resized { item, size },
                    None => {
                        self.state = GestureState::Idle;
                        GestureEffect::noop(NoopReason::ItemMissing)
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self, store: &mut SceneStore, event: &PointerEvent) -> GestureEffect {
        match self.state {
            GestureState::Idle => GestureEffect::noop(NoopReason::IdleWithoutActiveGesture),
            GestureState::Armed { pointer_id, .. }
            | GestureState::Dragging { pointer_id, .. }
            | GestureState::Resizing { pointer_id, .. }
                if pointer_id != event.pointer_id =>
            {
                GestureEffect::noop(NoopReason::PointerMismatch)
            }
            GestureState::Armed { subject, .. } => {
                self.state = GestureState::Idle;
                match subject {
                    ArmedSubject::Canvas => {
                        if store.select(None) {
                            GestureEffect::Deselected
                        } else {
                            GestureEffect::noop(NoopReason::NothingSelected)
                        }
                    }
                    ArmedSubject::Item { id, .. } => {
                        if !store.scene().contains(id) {
                            return GestureEffect::noop(NoopReason::ItemMissing);
                        }
                        store.select(Some(id));
                        GestureEffect::Selected { item: id }
                    }
                }
            }
            GestureState::Dragging {
                item,
                origin,
                item_origin,
                ..
            } => {
                self.state = GestureState::Idle;
                let (dx, dy) = delta(origin, event.point());
                store.move_item(item, dx, dy);
                match store.scene().get(item) {
                    Some(moved) => {
                        tracing::debug!(
                            "Drag committed for {item}: ({}, {}) -> ({}, {})",
                            item_origin.x,
                            item_origin.y,
                            moved.position.x,
                            moved.position.y
                        );
                        GestureEffect::DragCommitted {
                            item,
                            position: moved.position,
                        }
                    }
                    None => GestureEffect::noop(NoopReason::ItemMissing),
                }
            }
            GestureState::Resizing { item, .. } => {
                self.state = GestureState::Idle;
                GestureEffect::ResizeEnded { item }
            }
        }
    }

    fn pointer_cancel(&mut self, event: &PointerEvent) -> GestureEffect {
        match self.state {
            GestureState::Idle => GestureEffect::noop(NoopReason::IdleWithoutActiveGesture),
            GestureState::Armed { pointer_id, .. }
            | GestureState::Dragging { pointer_id, .. }
            | GestureState::Resizing { pointer_id, .. }
                if pointer_id != event.pointer_id =>
            {
                GestureEffect::noop(NoopReason::PointerMismatch)
            }
            GestureState::Armed { subject, .. } => {
                self.state = GestureState::Idle;
                match subject {
                    ArmedSubject::Item { id, .. } => GestureEffect::DragCanceled { item: id },
                    ArmedSubject::Canvas => GestureEffect::noop(NoopReason::CanvasDragIgnored),
                }
            }
            GestureState::Dragging { item, .. } => {
                self.state = GestureState::Idle;
                GestureEffect::DragCanceled { item }
            }
            GestureState::Resizing { item, .. } => {
                self.state = GestureState::Idle;
                GestureEffect::ResizeEnded { item }
            }
        }
    }
}

fn delta(from: (f32, f32), to: (f32, f32)) -> (f32, f32) {
    (to.0 - from.0, to.1 - from.1)
}

fn crossed_threshold(origin: (f32, f32), current: (f32, f32), threshold: f32) -> bool {
    let (dx, dy) = delta(origin, current);
    dx.hypot(dy) > threshold
}
