//! Scene graph for one day's canvas.
//!
//! Items are kept in paint order: the first item paints first (bottom), the
//! last paints last (top). There is no stored z-index.

use serde::{Deserialize, Serialize};

use crate::{Background, EditorError, EditorResult, ItemId, ItemPatch, SceneItem, Size};

/// Items, background, and selection of one canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Items in paint order.
    items: Vec<SceneItem>,
    /// Active background layer.
    background: Background,
    /// Currently selected item, by id.
    selected: Option<ItemId>,
}

impl Scene {
    /// Create an empty scene with the default background.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in paint order.
    #[must_use]
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    /// Get an item by ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Paint index of an item.
    #[must_use]
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Check whether an item is part of the scene.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// The active background.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// The selected item's id.
    #[must_use]
    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected
    }

    /// Resolve the selected item against the live item list.
    #[must_use]
    pub fn selected_item(&self) -> Option<&SceneItem> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Get the number of items in the scene.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the scene has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item on top of all others and select it.
    ///
    /// Sizes below the variant floor are raised to it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateItem`] if the id is already present.
    pub(crate) fn push(&mut self, mut item: SceneItem) -> EditorResult<ItemId> {
        if self.contains(item.id) {
            return Err(EditorError::DuplicateItem(item.id.to_string()));
        }
        item.validate()?;
        item.enforce_min_size();
        let id = item.id;
        self.items.push(item);
        self.selected = Some(id);
        Ok(id)
    }

    /// Merge a patch, keeping the item unchanged if the result fails
    /// [`SceneItem::validate`].
    pub(crate) fn update(&mut self, id: ItemId, patch: &ItemPatch) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        let mut patched = item.clone();
        if !patch.apply(&mut patched) {
            return false;
        }
        if let Err(e) = patched.validate() {
            tracing::warn!("Rejecting update to {id}: {e}");
            return false;
        }
        *item = patched;
        true
    }

    pub(crate) fn translate(&mut self, id: ItemId, dx: f32, dy: f32) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        let moved = item.position.offset(dx, dy);
        if moved == item.position {
            return false;
        }
        item.position = moved;
        true
    }

    pub(crate) fn resize(&mut self, id: ItemId, size: Size) -> bool {
        self.get_mut(id).is_some_and(|item| item.kind.set_size(size))
    }

    /// Splice the item out and push it onto the end.
    pub(crate) fn raise_to_top(&mut self, id: ItemId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.items.len() => {
                let item = self.items.remove(index);
                self.items.push(item);
                true
            }
            _ => false,
        }
    }

    /// Splice the item out and insert it at index 0.
    pub(crate) fn lower_to_bottom(&mut self, id: ItemId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                let item = self.items.remove(index);
                self.items.insert(0, item);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<SceneItem> {
        let index = self.index_of(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.items.remove(index))
    }

    /// Unknown ids clear the selection.
    pub(crate) fn set_selected(&mut self, id: Option<ItemId>) -> bool {
        let next = id.filter(|id| self.contains(*id));
        if self.selected == next {
            return false;
        }
        self.selected = next;
        true
    }

    pub(crate) fn set_background(&mut self, background: Background) -> bool {
        if self.background == background {
            return false;
        }
        if let Err(e) = background.validate() {
            tracing::warn!("Rejecting background: {e}");
            return false;
        }
        self.background = background;
        true
    }

    pub(crate) fn reset(&mut self) -> bool {
        let fresh = Self::new();
        if *self == fresh {
            return false;
        }
        *self = fresh;
        true
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

/// Build a scene from parts, dropping items whose id repeats.
pub(crate) fn assemble(background: Background, items: Vec<SceneItem>) -> Scene {
    let mut scene = Scene {
        items: Vec::with_capacity(items.len()),
        background,
        selected: None,
    };
    for item in items {
        if let Err(e) = scene.push(item) {
            tracing::warn!("Dropping item while loading scene: {e}");
        }
    }
    scene.selected = None;
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_image, create_text};

    fn order(scene: &Scene) -> Vec<ItemId> {
        scene.items().iter().map(|item| item.id).collect()
    }

    fn scene_with(n: usize) -> (Scene, Vec<ItemId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|_| scene.push(create_text()).expect("push"))
            .collect();
        (scene, ids)
    }

    #[test]
    fn push_appends_and_selects() {
        let (scene, ids) = scene_with(3);
        assert_eq!(order(&scene), ids);
        assert_eq!(scene.selected_id(), Some(ids[2]));
    }

    #[test]
    fn push_rejects_duplicate_id() {
        let mut scene = Scene::new();
        let item = create_text();
        scene.push(item.clone()).expect("first push");
        assert!(matches!(scene.push(item), Err(EditorError::DuplicateItem(_))));
        assert_eq!(scene.item_count(), 1);
    }

    #[test]
    fn push_rejects_unsafe_link() {
        let mut scene = Scene::new();
        let mut link = crate::create_link("https://a.com", "Go").expect("link");
        if let crate::ItemKind::Link(l) = &mut link.kind {
            l.url = "javascript:alert(1)".into();
        }
        assert!(matches!(scene.push(link), Err(EditorError::InvalidInput(_))));
        assert!(scene.is_empty());
    }

    #[test]
    fn update_keeps_item_when_patch_is_unsafe() {
        let mut scene = Scene::new();
        let id = scene.push(create_text()).expect("push");
        let before = scene.get(id).cloned();
        let patch = ItemPatch {
            content: Some("Hi".into()),
            color: Some("#000; position: fixed".into()),
            ..ItemPatch::default()
        };
        assert!(!scene.update(id, &patch));
        assert_eq!(scene.get(id).cloned(), before);

        assert!(!scene.set_background(Background::Color("red; top: 0".into())));
        assert_eq!(scene.background(), &Background::default());
    }

    #[test]
    fn raise_and_lower_splice() {
        let (mut scene, ids) = scene_with(4);
        assert!(scene.raise_to_top(ids[1]));
        assert_eq!(order(&scene), vec![ids[0], ids[2], ids[3], ids[1]]);
        assert!(!scene.raise_to_top(ids[1]));

        assert!(scene.lower_to_bottom(ids[3]));
        assert_eq!(order(&scene), vec![ids[3], ids[0], ids[2], ids[1]]);
        assert!(!scene.lower_to_bottom(ids[3]));
    }

    #[test]
    fn remove_clears_matching_selection_only() {
        let (mut scene, ids) = scene_with(2);
        assert!(scene.set_selected(Some(ids[0])));
        assert!(scene.remove(ids[1]).is_some());
        assert_eq!(scene.selected_id(), Some(ids[0]));
        assert!(scene.remove(ids[0]).is_some());
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn selecting_unknown_id_clears_selection() {
        let (mut scene, _) = scene_with(1);
        assert!(scene.set_selected(Some(ItemId::new())));
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn push_floors_undersized_items() {
        let mut scene = Scene::new();
        let mut item = create_image("a.png");
        if let crate::ItemKind::Image(image) = &mut item.kind {
            image.size = Size::new(1.0, 1.0);
        }
        let id = scene.push(item).expect("push");
        let size = scene.get(id).and_then(|i| i.kind.size());
        assert_eq!(size, Some(Size::new(50.0, 50.0)));
    }

    #[test]
    fn assemble_skips_repeated_ids_and_selection() {
        let item = create_text();
        let scene = assemble(Background::default(), vec![item.clone(), item]);
        assert_eq!(scene.item_count(), 1);
        assert_eq!(scene.selected_id(), None);
    }
}
