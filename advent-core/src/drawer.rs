//! Tool drawer: entry points that create items and change the background.
//!
//! File reads are asynchronous in the host. The drawer hands out an
//! [`UploadRequest`] ticket when a picker opens and mutates the store only
//! when the ticket is completed with the file contents. Each request is a fresh
//! ticket, so picking the same file twice produces two completions.

use serde::{Deserialize, Serialize};

use crate::validate::require_color;
use crate::{
    create_image, create_link, create_sticker, create_text, data_uri, Background, EditorError,
    EditorResult, ItemId, SceneStore, DEFAULT_LINK_LABEL,
};

/// Background images bundled with the editor.
pub const DEFAULT_BACKGROUNDS: &[&str] = &[
    "assets/backgrounds/snowy-night.jpg",
    "assets/backgrounds/pine-forest.jpg",
    "assets/backgrounds/candy-cane.png",
    "assets/backgrounds/gingerbread.jpg",
    "assets/backgrounds/northern-lights.jpg",
];

/// Stickers bundled with the editor.
pub const DEFAULT_STICKERS: &[&str] = &[
    "assets/stickers/snowman.png",
    "assets/stickers/gift.png",
    "assets/stickers/star.png",
    "assets/stickers/bell.png",
    "assets/stickers/stocking.png",
    "assets/stickers/reindeer.png",
];

/// Fixed, ordered registry of preset backgrounds and stickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCatalog {
    backgrounds: Vec<String>,
    stickers: Vec<String>,
}

impl AssetCatalog {
    /// Create a catalog from explicit lists.
    #[must_use]
    pub fn new(backgrounds: Vec<String>, stickers: Vec<String>) -> Self {
        Self {
            backgrounds,
            stickers,
        }
    }

    /// Preset background URLs in gallery order.
    #[must_use]
    pub fn backgrounds(&self) -> &[String] {
        &self.backgrounds
    }

    /// Sticker URLs in gallery order.
    #[must_use]
    pub fn stickers(&self) -> &[String] {
        &self.stickers
    }

    /// Whether `url` is a registered background preset.
    #[must_use]
    pub fn has_background(&self, url: &str) -> bool {
        self.backgrounds.iter().any(|b| b == url)
    }

    /// Whether `url` is a registered sticker.
    #[must_use]
    pub fn has_sticker(&self, url: &str) -> bool {
        self.stickers.iter().any(|s| s == url)
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_BACKGROUNDS.iter().map(ToString::to_string).collect(),
            DEFAULT_STICKERS.iter().map(ToString::to_string).collect(),
        )
    }
}

/// Slot an upload will fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    /// A new image item.
    Item,
    /// The canvas background.
    Background,
}

/// Ticket for one open file picker.
///
/// Completed exactly once through [`ToolDrawer::complete_upload`].
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    id: u64,
    target: UploadTarget,
}

impl UploadRequest {
    /// Ticket number, unique per drawer.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Slot this upload fills.
    #[must_use]
    pub const fn target(&self) -> UploadTarget {
        self.target
    }
}

/// Contents of a file read by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported by the host, if any.
    pub mime: Option<String>,
}

impl FilePayload {
    /// Payload with a known MIME type.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: Some(mime.into()),
        }
    }
}

/// Result of completing an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "applied", content = "id", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// A new image item was added.
    ItemAdded(ItemId),
    /// The background was replaced.
    BackgroundSet,
}

/// Form state of the "add link" modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDialog {
    /// Target URL, required.
    pub url: String,
    /// Button label, optional.
    pub label: String,
}

impl Default for LinkDialog {
    fn default() -> Self {
        Self {
            url: String::new(),
            label: DEFAULT_LINK_LABEL.to_string(),
        }
    }
}

/// Pending "clear canvas" confirmation.
///
/// Dropping the request cancels it; only [`ClearRequest::confirm`] clears.
#[derive(Debug)]
#[must_use = "a clear request does nothing unless confirmed"]
pub struct ClearRequest {
    _confirmation: (),
}

impl ClearRequest {
    /// Confirm and clear the scene. Returns whether anything was removed.
    pub fn confirm(self, store: &mut SceneStore) -> bool {
        tracing::debug!("Clear confirmed");
        store.clear()
    }

    /// Decline the request.
    pub fn cancel(self) {
        tracing::debug!("Clear canceled");
    }
}

/// The drawer below the canvas.
#[derive(Debug, Clone, Default)]
pub struct ToolDrawer {
    open: bool,
    link_dialog: Option<LinkDialog>,
    next_request: u64,
    catalog: AssetCatalog,
}

impl ToolDrawer {
    /// Create a closed drawer over `catalog`.
    #[must_use]
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Registered presets.
    #[must_use]
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Whether the drawer is expanded.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Expand or collapse the drawer.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Collapse the drawer.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Add a default text item.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn add_text(&mut self, store: &mut SceneStore) -> EditorResult<ItemId> {
        self.close();
        store.add_item(create_text())
    }

    /// Open the image picker.
    pub fn request_image_upload(&mut self) -> UploadRequest {
        self.close();
        self.ticket(UploadTarget::Item)
    }

    /// Open the background image picker.
    pub fn request_background_upload(&mut self) -> UploadRequest {
        self.ticket(UploadTarget::Background)
    }

    fn ticket(&mut self, target: UploadTarget) -> UploadRequest {
        self.next_request += 1;
        UploadRequest {
            id: self.next_request,
            target,
        }
    }

    /// Finish an upload with the host's file read result.
    ///
    /// Completions apply in the order they arrive; for the background the last
    /// one wins.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UploadFailed`] if the read failed or the file is
    /// not an image. The store is left unchanged.
    #[allow(clippy::unused_self, clippy::needless_pass_by_value)]
    pub fn complete_upload(
        &mut self,
        store: &mut SceneStore,
        request: UploadRequest,
        read: Result<FilePayload, String>,
    ) -> EditorResult<UploadOutcome> {
        let src = read
            .map_err(EditorError::UploadFailed)
            .and_then(|file| data_uri::encode_image(&file.bytes, file.mime.as_deref()))
            .inspect_err(|e| {
                tracing::warn!("Upload {} for {:?} failed: {e}", request.id, request.target);
            })?;
        match request.target {
            UploadTarget::Item => store.add_item(create_image(src)).map(UploadOutcome::ItemAdded),
            UploadTarget::Background => {
                store.set_background(Background::Image(src));
                Ok(UploadOutcome::BackgroundSet)
            }
        }
    }

    /// Open the link modal with an empty URL and the default label.
    pub fn open_link_dialog(&mut self) -> &mut LinkDialog {
        self.close();
        self.link_dialog.insert(LinkDialog::default())
    }

    /// The link modal, when open.
    #[must_use]
    pub fn link_dialog(&self) -> Option<&LinkDialog> {
        self.link_dialog.as_ref()
    }

    /// Edit the link modal fields, when open.
    pub fn link_dialog_mut(&mut self) -> Option<&mut LinkDialog> {
        self.link_dialog.as_mut()
    }

    /// Dismiss the link modal without adding anything.
    pub fn cancel_link_dialog(&mut self) {
        self.link_dialog = None;
    }

    /// Add a link button from the modal and close it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] if the modal is not open or the URL
    /// is empty. In the latter case the modal stays open for correction.
    pub fn confirm_link(&mut self, store: &mut SceneStore) -> EditorResult<ItemId> {
        let dialog = self
            .link_dialog
            .as_ref()
            .ok_or_else(|| EditorError::InvalidInput("link dialog is not open".into()))?;
        let item = create_link(&dialog.url, &dialog.label)?;
        let id = store.add_item(item)?;
        self.link_dialog = None;
        Ok(id)
    }

    /// Set a solid background color.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] if `color` is empty or not a
    /// CSS color.
    #[allow(clippy::unused_self)]
    pub fn set_background_color(
        &mut self,
        store: &mut SceneStore,
        color: &str,
    ) -> EditorResult<bool> {
        let color = color.trim();
        if color.is_empty() {
            return Err(EditorError::InvalidInput("background color is required".into()));
        }
        require_color(color)?;
        Ok(store.set_background(Background::Color(color.to_string())))
    }

    /// Use a preset background image.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownAsset`] if `url` is not a registered preset.
    pub fn choose_background_preset(
        &mut self,
        store: &mut SceneStore,
        url: &str,
    ) -> EditorResult<bool> {
        if !self.catalog.has_background(url) {
            return Err(EditorError::UnknownAsset(url.to_string()));
        }
        Ok(store.set_background(Background::Image(url.to_string())))
    }

    /// Add a sticker at the small sticker size.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownAsset`] if `url` is not a registered sticker.
    pub fn add_sticker(&mut self, store: &mut SceneStore, url: &str) -> EditorResult<ItemId> {
        if !self.catalog.has_sticker(url) {
            return Err(EditorError::UnknownAsset(url.to_string()));
        }
        store.add_item(create_sticker(url))
    }

    /// Ask to clear the canvas. Nothing happens until the request is confirmed.
    pub fn request_clear(&mut self) -> ClearRequest {
        self.close();
        ClearRequest { _confirmation: () }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemKind, Size};

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn png() -> FilePayload {
        FilePayload::new(PNG_MAGIC.to_vec(), "image/png")
    }

    #[test]
    fn add_text_closes_drawer() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        assert!(drawer.toggle());
        let id = drawer.add_text(&mut store).expect("add");
        assert!(!drawer.is_open());
        assert_eq!(store.scene().selected_id(), Some(id));
    }

    #[test]
    fn image_upload_adds_data_uri_item() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let request = drawer.request_image_upload();
        assert_eq!(request.target(), UploadTarget::Item);

        let outcome = drawer
            .complete_upload(&mut store, request, Ok(png()))
            .expect("upload");
        let UploadOutcome::ItemAdded(id) = outcome else {
            panic!("expected item");
        };
        let ItemKind::Image(image) = &store.scene().get(id).expect("item").kind else {
            panic!("expected image");
        };
        assert!(image.src.starts_with("data:image/png;base64,"));
        assert_eq!(image.size, Size::new(200.0, 200.0));
    }

    #[test]
    fn every_request_is_a_fresh_ticket() {
        let mut drawer = ToolDrawer::default();
        let first = drawer.request_image_upload();
        let second = drawer.request_image_upload();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn failed_read_leaves_store_unchanged() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let request = drawer.request_background_upload();
        let err = drawer
            .complete_upload(&mut store, request, Err("permission denied".into()))
            .expect_err("read failed");
        assert!(matches!(err, EditorError::UploadFailed(_)));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn last_background_completion_wins() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let first = drawer.request_background_upload();
        let second = drawer.request_background_upload();
        let jpeg = FilePayload::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg");

        drawer
            .complete_upload(&mut store, second, Ok(jpeg))
            .expect("second");
        drawer.complete_upload(&mut store, first, Ok(png())).expect("first");

        let Background::Image(src) = store.scene().background() else {
            panic!("expected image background");
        };
        assert!(src.starts_with("data:image/png"));
    }

    #[test]
    fn link_dialog_rejects_empty_url_and_stays_open() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let dialog = drawer.open_link_dialog();
        assert_eq!(dialog.label, "Click Here");
        assert!(dialog.url.is_empty());

        assert!(matches!(
            drawer.confirm_link(&mut store),
            Err(EditorError::InvalidInput(_))
        ));
        assert!(drawer.link_dialog().is_some());
        assert!(store.scene().is_empty());

        if let Some(dialog) = drawer.link_dialog_mut() {
            dialog.url = "https://example.com".into();
            dialog.label.clear();
        }
        let id = drawer.confirm_link(&mut store).expect("link");
        assert!(drawer.link_dialog().is_none());
        let ItemKind::Link(link) = &store.scene().get(id).expect("item").kind else {
            panic!("expected link");
        };
        assert_eq!(link.content, "Click Here");
    }

    #[test]
    fn confirm_without_dialog_is_rejected() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        assert!(drawer.confirm_link(&mut store).is_err());
    }

    #[test]
    fn presets_must_be_registered() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let preset = drawer.catalog().backgrounds()[0].clone();
        assert!(drawer
            .choose_background_preset(&mut store, &preset)
            .expect("preset"));
        assert!(matches!(
            drawer.choose_background_preset(&mut store, "https://evil/bg.png"),
            Err(EditorError::UnknownAsset(_))
        ));
        assert_eq!(store.scene().background(), &Background::Image(preset));
    }

    #[test]
    fn stickers_are_small_images() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        let sticker = drawer.catalog().stickers()[2].clone();
        let id = drawer.add_sticker(&mut store, &sticker).expect("sticker");
        assert_eq!(
            store.scene().get(id).and_then(|i| i.kind.size()),
            Some(Size::new(100.0, 100.0))
        );
        assert!(drawer.add_sticker(&mut store, "nope.png").is_err());
    }

    #[test]
    fn background_color_replaces_image() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        store.set_background(Background::Image("x.png".into()));
        assert!(drawer
            .set_background_color(&mut store, "#ff0000")
            .expect("color"));
        assert_eq!(
            store.scene().background(),
            &Background::Color("#ff0000".into())
        );
        assert!(drawer.set_background_color(&mut store, " ").is_err());
        assert!(matches!(
            drawer.set_background_color(&mut store, "#fff; background-image: url(https://evil/)"),
            Err(EditorError::InvalidInput(_))
        ));
        assert_eq!(
            store.scene().background(),
            &Background::Color("#ff0000".into())
        );
    }

    #[test]
    fn clear_needs_confirmation() {
        let mut store = SceneStore::new();
        let mut drawer = ToolDrawer::default();
        drawer.add_text(&mut store).expect("add");

        drawer.request_clear().cancel();
        let _unconfirmed = drawer.request_clear();
        assert_eq!(store.scene().item_count(), 1);

        assert!(drawer.request_clear().confirm(&mut store));
        assert!(store.scene().is_empty());
        assert_eq!(store.scene().selected_id(), None);
    }
}
