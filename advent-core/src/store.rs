//! Observable scene storage for the day editor.
//!
//! [`SceneStore`] exclusively owns the [`Scene`]. Every operation that changes
//! state bumps the revision once and notifies each subscriber once, after the
//! change is fully applied. Operations that change nothing (unknown id,
//! repeated `bring_to_front`, ...) are silent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Background, EditorResult, ItemId, ItemPatch, Scene, SceneDocument, SceneItem, Size};

/// A state transition applied to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Item appended on top and selected.
    AddItem {
        /// The new item.
        id: ItemId,
    },
    /// Fields merged into an item.
    UpdateItem {
        /// The updated item.
        id: ItemId,
    },
    /// Item translated.
    MoveItem {
        /// The moved item.
        id: ItemId,
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Item resized (after flooring).
    ResizeItem {
        /// The resized item.
        id: ItemId,
        /// Size actually applied.
        size: Size,
    },
    /// Item moved to the end of the paint order.
    BringToFront {
        /// The raised item.
        id: ItemId,
    },
    /// Item moved to the start of the paint order.
    SendToBack {
        /// The lowered item.
        id: ItemId,
    },
    /// Item removed.
    DeleteItem {
        /// The removed item.
        id: ItemId,
    },
    /// Selection changed.
    Select {
        /// New selection.
        id: Option<ItemId>,
    },
    /// Background replaced.
    SetBackground,
    /// Scene emptied and background reset.
    Clear,
    /// Whole scene replaced from a stored document.
    Load,
}

/// Notification delivered to subscribers after a mutation.
#[derive(Debug, Clone, Copy)]
pub struct SceneChange<'a> {
    /// Revision after the mutation.
    pub revision: u64,
    /// What changed.
    pub mutation: &'a Mutation,
    /// The scene after the mutation.
    pub scene: &'a Scene,
}

/// Handle returned by [`SceneStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SceneChange<'_>)>;

/// Single owner of the scene; every tool and toolbar mutates through it.
///
/// # Example
///
/// ```
/// use advent_core::{create_text, SceneStore};
///
/// let mut store = SceneStore::new();
/// let id = store.add_item(create_text()).unwrap();
/// assert_eq!(store.scene().selected_id(), Some(id));
/// assert_eq!(store.revision(), 1);
/// ```
#[derive(Default)]
pub struct SceneStore {
    scene: Scene,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneStore")
            .field("scene", &self.scene)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SceneStore {
    /// Create a store holding an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store around an existing scene.
    #[must_use]
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    /// The current scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of state changes applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback run once after every state change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SceneChange<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Append an item on top of the paint order and select it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::DuplicateItem`] if the id is already used.
    pub fn add_item(&mut self, item: SceneItem) -> EditorResult<ItemId> {
        let kind = item.kind.name();
        let id = self.scene.push(item)?;
        tracing::debug!("Added {kind} item {id}");
        self.commit(Mutation::AddItem { id });
        Ok(id)
    }

    /// Merge `patch` into the item. Unknown ids are ignored.
    pub fn update_item(&mut self, id: ItemId, patch: &ItemPatch) -> bool {
        self.apply(
            |scene| scene.update(id, patch),
            || Mutation::UpdateItem { id },
        )
    }

    /// Translate the item by a delta. Unknown ids are ignored.
    pub fn move_item(&mut self, id: ItemId, dx: f32, dy: f32) -> bool {
        self.apply(
            |scene| scene.translate(id, dx, dy),
            || Mutation::MoveItem { id, dx, dy },
        )
    }

    /// Set the item size, floored per axis at the variant minimum.
    ///
    /// Text items and unknown ids are ignored.
    pub fn resize_item(&mut self, id: ItemId, width: f32, height: f32) -> bool {
        let changed = self.scene.resize(id, Size::new(width, height));
        if changed {
            let size = self
                .scene
                .get(id)
                .and_then(|item| item.kind.size())
                .unwrap_or_default();
            self.commit(Mutation::ResizeItem { id, size });
        } else {
            tracing::trace!("Resize of {id} left the scene unchanged");
        }
        changed
    }

    /// Move the item to the top of the paint order.
    pub fn bring_to_front(&mut self, id: ItemId) -> bool {
        self.apply(
            |scene| scene.raise_to_top(id),
            || Mutation::BringToFront { id },
        )
    }

    /// Move the item to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: ItemId) -> bool {
        self.apply(
            |scene| scene.lower_to_bottom(id),
            || Mutation::SendToBack { id },
        )
    }

    /// Remove the item, clearing the selection if it pointed at it.
    pub fn delete_item(&mut self, id: ItemId) -> Option<SceneItem> {
        let removed = self.scene.remove(id);
        if removed.is_some() {
            self.commit(Mutation::DeleteItem { id });
        } else {
            tracing::debug!("Delete ignored, item {id} not in scene");
        }
        removed
    }

    /// Change the selection. Ids not in the scene select nothing.
    pub fn select(&mut self, id: Option<ItemId>) -> bool {
        let changed = self.scene.set_selected(id);
        if changed {
            let id = self.scene.selected_id();
            self.commit(Mutation::Select { id });
        }
        changed
    }

    /// Replace the background.
    pub fn set_background(&mut self, background: Background) -> bool {
        self.apply(
            |scene| scene.set_background(background),
            || Mutation::SetBackground,
        )
    }

    /// Remove every item, reset the background, and clear the selection.
    ///
    /// User-facing callers go through [`crate::drawer::ClearRequest`].
    pub fn clear(&mut self) -> bool {
        let count = self.scene.item_count();
        let changed = self.scene.reset();
        if changed {
            tracing::debug!("Cleared scene ({count} items removed)");
            self.commit(Mutation::Clear);
        }
        changed
    }

    /// Replace the whole scene from a stored document.
    ///
    /// Selection is reset; items with repeated ids are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::UnsupportedVersion`] if the document was
    /// written by an incompatible version. The current scene is kept.
    pub fn load(&mut self, document: SceneDocument) -> EditorResult<()> {
        let scene = document.into_scene()?;
        tracing::debug!("Loaded scene with {} items", scene.item_count());
        self.scene = scene;
        self.commit(Mutation::Load);
        Ok(())
    }

    /// Snapshot the scene as a stored document.
    #[must_use]
    pub fn document(&self) -> SceneDocument {
        SceneDocument::from_scene(&self.scene)
    }

    fn apply<F, M>(&mut self, change: F, mutation: M) -> bool
    where
        F: FnOnce(&mut Scene) -> bool,
        M: FnOnce() -> Mutation,
    {
        let changed = change(&mut self.scene);
        if changed {
            self.commit(mutation());
        } else {
            tracing::debug!("Store operation left the scene unchanged");
        }
        changed
    }

    fn commit(&mut self, mutation: Mutation) {
        self.revision += 1;
        let change = SceneChange {
            revision: self.revision,
            mutation: &mutation,
            scene: &self.scene,
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}
