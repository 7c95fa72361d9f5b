//! Day Persistence Integration Tests
//!
//! Builds a day through the editor host, saves it, and reopens it:
//! - A reopened day paints the same frame
//! - A day never saved opens as an empty canvas
//! - Day numbers outside 1..=24 are refused
//! - Links with script URLs never reach the published page

use advent_app::{AppError, EditorApp, EditorConfig};
use advent_core::{
    Background, EditorError, FilePayload, PointerPhase, SceneDocument, ToolbarAction,
    UploadOutcome,
};
use advent_renderer::RenderMode;
use advent_storage::{CalendarRepository, CalendarToken, MemoryObjectStore, StorageError};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn token() -> CalendarToken {
    CalendarToken::parse("family-2026").expect("token")
}

fn editor() -> EditorApp {
    EditorApp::new(EditorConfig::default()).expect("editor")
}

/// Build a day with one of everything the drawer offers.
fn build_day(app: &mut EditorApp) {
    let text = app.add_text().expect("text");
    assert!(app.edit_text(text, "Day one!"));
    app.toolbar(ToolbarAction::ToggleBold).expect("bold");

    let upload = app.request_image_upload();
    let outcome = app
        .complete_upload(upload, Ok(FilePayload::new(PNG.to_vec(), "image/png")))
        .expect("image");
    assert!(matches!(outcome, UploadOutcome::ItemAdded(_)));

    app.open_link_dialog().url = "https://example.com/door-1".into();
    app.confirm_link().expect("link");

    assert!(app.set_background_color("#0b3d2e").expect("background"));
}

// ============================================================================
// Save and reopen
// ============================================================================

#[tokio::test]
async fn test_reopened_day_paints_same_frame() {
    let repo = CalendarRepository::new(MemoryObjectStore::new());
    let mut author = editor();
    build_day(&mut author);

    // Selection is not saved, so compare with nothing selected.
    author.pointer(PointerPhase::Down, 1, 5.0, 590.0);
    author.pointer(PointerPhase::Up, 1, 5.0, 590.0);
    assert!(author.store().scene().selected_id().is_none());

    let url = author.save_day(&repo, &token(), 1).await.expect("save");
    assert_eq!(url, "memory://calendar/family-2026/day1/manifest.json");

    let mut reader = editor();
    assert!(reader.load_day(&repo, &token(), 1).await.expect("load"));
    assert_eq!(reader.document(), author.document());
    assert_eq!(reader.frame(), author.frame());
    assert_eq!(
        reader.store().scene().background(),
        &Background::Color("#0b3d2e".into())
    );
}

#[tokio::test]
async fn test_read_only_viewer_hides_editing_affordances() {
    let repo = CalendarRepository::new(MemoryObjectStore::new());
    let mut author = editor();
    build_day(&mut author);
    author.save_day(&repo, &token(), 7).await.expect("save");

    let mut viewer = EditorApp::new(EditorConfig::read_only()).expect("viewer");
    assert_eq!(viewer.config().mode, RenderMode::ReadOnly);
    viewer.load_day(&repo, &token(), 7).await.expect("load");

    let html = viewer.render_html().expect("html");
    assert!(html.contains("Day one!"));
    assert!(html.contains("https://example.com/door-1"));
    assert!(!html.contains("resize-handle"));
    assert!(!html.contains("text-toolbar"));
}

// ============================================================================
// Missing and invalid days
// ============================================================================

#[tokio::test]
async fn test_unsaved_day_opens_empty() {
    let repo = CalendarRepository::new(MemoryObjectStore::new());
    let mut app = editor();
    build_day(&mut app);

    assert!(!app.load_day(&repo, &token(), 24).await.expect("load"));
    assert!(app.store().scene().is_empty());
    assert_eq!(app.store().scene().background(), &Background::default());
}

#[tokio::test]
async fn test_day_out_of_range_is_refused() {
    let repo = CalendarRepository::new(MemoryObjectStore::new());
    let app = editor();

    let err = app
        .save_day(&repo, &token(), 25)
        .await
        .expect_err("day 25");
    assert!(matches!(
        err,
        AppError::Storage(StorageError::InvalidDay(25))
    ));
    assert!(repo.store().is_empty());
}

// ============================================================================
// Unsafe links
// ============================================================================

#[test]
fn test_script_link_is_refused_when_authored() {
    let mut app = editor();
    app.open_link_dialog().url = "javascript:alert(document.cookie)".into();
    assert!(matches!(
        app.confirm_link(),
        Err(EditorError::InvalidInput(_))
    ));
    assert!(app.store().scene().is_empty());
}

#[test]
fn test_tampered_day_with_script_link_is_refused() {
    let mut author = editor();
    build_day(&mut author);
    let json = author
        .document()
        .to_json()
        .expect("serialize")
        .replace("https://example.com/door-1", "javascript:alert(document.cookie)");
    let document = SceneDocument::from_json(&json).expect("parse");

    let mut viewer = EditorApp::new(EditorConfig::read_only()).expect("viewer");
    assert!(matches!(
        viewer.load_document(document),
        Err(EditorError::InvalidInput(_))
    ));
    let html = viewer.render_html().expect("html");
    assert!(!html.contains("javascript:"));
}
