//! Editor Workflow Integration Tests
//!
//! Drives the core the way the page does:
//! - Drawer actions create items
//! - Pointer gestures move, select, and resize them
//! - Toolbar actions restyle and reorder them
//! - The scene survives a save/load round trip

use std::cell::Cell;
use std::rc::Rc;

use advent_core::{
    Background, FilePayload, GestureEffect, GestureEngine, HitTarget, ItemKind, PointerEvent,
    Position, SceneDocument, SceneStore, Size, ToolDrawer, ToolbarAction, UploadOutcome,
};

/// Create a store that counts notifications.
fn counted_store() -> (SceneStore, Rc<Cell<u32>>) {
    let mut store = SceneStore::new();
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    store.subscribe(move |_| sink.set(sink.get() + 1));
    (store, count)
}

// ============================================================================
// Build-a-day Workflow
// ============================================================================

#[test]
fn test_build_a_day_end_to_end() {
    let (mut store, notifications) = counted_store();
    let mut drawer = ToolDrawer::default();
    let mut gestures = GestureEngine::default();

    let text = drawer.add_text(&mut store).expect("text");
    drawer.open_link_dialog().url = "https://example.com/door-1".into();
    let link = drawer.confirm_link(&mut store).expect("link");
    let sticker_url = drawer.catalog().stickers()[0].clone();
    let sticker = drawer.add_sticker(&mut store, &sticker_url).expect("sticker");
    assert_eq!(notifications.get(), 3);

    // Drag the text from (100,100) by (+50,-20).
    gestures.handle(&mut store, &PointerEvent::down(1, 110.0, 110.0, HitTarget::Item(text)));
    gestures.handle(&mut store, &PointerEvent::moved(1, 135.0, 100.0));
    let committed = gestures.handle(&mut store, &PointerEvent::up(1, 160.0, 90.0));
    assert_eq!(
        committed,
        GestureEffect::DragCommitted {
            item: text,
            position: Position::new(150.0, 80.0)
        }
    );
    assert_eq!(notifications.get(), 4);

    // Click the text to select it, then make it bold and raise it.
    gestures.handle(&mut store, &PointerEvent::down(1, 151.0, 81.0, HitTarget::Item(text)));
    gestures.handle(&mut store, &PointerEvent::up(1, 151.0, 81.0));
    assert_eq!(store.scene().selected_id(), Some(text));
    ToolbarAction::ToggleBold.apply(&mut store).expect("bold");
    ToolbarAction::BringToFront.apply(&mut store).expect("front");

    let order: Vec<_> = store.scene().items().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![link, sticker, text]);

    // Select the sticker and shrink it below its floor.
    store.select(Some(sticker));
    gestures.handle(
        &mut store,
        &PointerEvent::down(1, 200.0, 200.0, HitTarget::ResizeHandle(sticker)),
    );
    gestures.handle(&mut store, &PointerEvent::moved(1, 0.0, 0.0));
    gestures.handle(&mut store, &PointerEvent::up(1, 0.0, 0.0));
    assert_eq!(
        store.scene().get(sticker).and_then(|i| i.kind.size()),
        Some(Size::new(50.0, 50.0))
    );

    // Click empty canvas to deselect.
    gestures.handle(&mut store, &PointerEvent::down(1, 700.0, 500.0, HitTarget::Canvas));
    assert_eq!(
        gestures.handle(&mut store, &PointerEvent::up(1, 700.0, 500.0)),
        GestureEffect::Deselected
    );
}

#[test]
fn test_uploaded_background_then_clear() {
    let mut store = SceneStore::new();
    let mut drawer = ToolDrawer::default();
    let request = drawer.request_background_upload();
    let outcome = drawer
        .complete_upload(
            &mut store,
            request,
            Ok(FilePayload::new(vec![0xFF, 0xD8, 0xFF, 0xDB], "image/jpeg")),
        )
        .expect("upload");
    assert_eq!(outcome, UploadOutcome::BackgroundSet);
    drawer.add_text(&mut store).expect("text");

    assert!(drawer.request_clear().confirm(&mut store));
    assert!(store.scene().is_empty());
    assert_eq!(store.scene().background(), &Background::default());
    assert_eq!(store.scene().selected_id(), None);
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_round_trip_with_every_item_type() {
    let mut store = SceneStore::new();
    let mut drawer = ToolDrawer::default();
    let text = drawer.add_text(&mut store).expect("text");
    store.update_item(
        text,
        &advent_core::ItemPatch {
            content: Some("Day 1: snow!".into()),
            color: Some("#aa0000".into()),
            ..advent_core::ItemPatch::default()
        },
    );
    let image = drawer.request_image_upload();
    drawer
        .complete_upload(
            &mut store,
            image,
            Ok(FilePayload::new(
                vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
                "image/png",
            )),
        )
        .expect("image");
    drawer.open_link_dialog().url = "https://a.com".into();
    drawer.confirm_link(&mut store).expect("link");
    drawer
        .set_background_color(&mut store, "#102030")
        .expect("background");

    let json = store.document().to_json().expect("serialize");
    let mut restored = SceneStore::new();
    restored
        .load(SceneDocument::from_json(&json).expect("parse"))
        .expect("load");

    assert_eq!(restored.scene().items(), store.scene().items());
    assert_eq!(restored.scene().background(), store.scene().background());
    let kinds: Vec<_> = restored
        .scene()
        .items()
        .iter()
        .map(|i| match &i.kind {
            ItemKind::Text(_) => "text",
            ItemKind::Image(_) => "image",
            ItemKind::Link(_) => "link",
        })
        .collect();
    assert_eq!(kinds, vec!["text", "image", "link"]);
}
