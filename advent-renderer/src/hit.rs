//! Hit testing: point to [`HitTarget`].
//!
//! Walks the frame front-to-back: toolbar first, then items from the top of
//! the paint order down, falling through to the canvas.

use advent_core::HitTarget;

use crate::view::{Frame, ItemContent, ItemView};
use crate::RenderMode;

/// Find what lies under `(px, py)`.
#[must_use]
pub fn hit_test(frame: &Frame, px: f32, py: f32) -> HitTarget {
    if frame
        .toolbar
        .as_ref()
        .is_some_and(|toolbar| toolbar.bounds.contains(px, py))
    {
        return HitTarget::Toolbar;
    }

    frame
        .nodes
        .iter()
        .rev()
        .find_map(|node| hit_node(node, frame.mode, px, py))
        .unwrap_or(HitTarget::Canvas)
}

fn hit_node(node: &ItemView, mode: RenderMode, px: f32, py: f32) -> Option<HitTarget> {
    if node
        .resize_handle
        .is_some_and(|handle| handle.contains(px, py))
    {
        return Some(HitTarget::ResizeHandle(node.id));
    }
    if !node.bounds.contains(px, py) {
        return None;
    }
    if mode == RenderMode::Edit {
        if let ItemContent::TextField { field, .. } = &node.content {
            if field.contains(px, py) {
                return Some(HitTarget::TextField(node.id));
            }
        }
    }
    Some(HitTarget::Item(node.id))
}
