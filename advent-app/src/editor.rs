//! The editor host.
//!
//! [`EditorApp`] owns every piece of editor state and is the single entry
//! point for host input: pointer events, text edits, toolbar and drawer
//! actions, and save/load of a day.

use advent_core::{
    ClearRequest, EditorResult, FilePayload, GestureEffect, GestureEngine, ItemId, ItemPatch,
    LinkDialog, PointerEvent, PointerPhase, SceneChange, SceneDocument, SceneStore,
    SubscriptionId, ToolDrawer, ToolbarAction, UploadOutcome, UploadRequest,
};
use advent_renderer::{hit_test, Frame, Renderer};
use advent_storage::{CalendarRepository, CalendarToken, ObjectStore};
use tracing::{debug, info};

use crate::{AppResult, EditorConfig};

/// Editor for one day's canvas.
#[derive(Debug)]
pub struct EditorApp {
    config: EditorConfig,
    store: SceneStore,
    gestures: GestureEngine,
    drawer: ToolDrawer,
    renderer: Renderer,
}

impl EditorApp {
    /// Create an editor over an empty canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EditorConfig) -> AppResult<Self> {
        let renderer = Renderer::new(config.renderer_config())?;
        Self::with_renderer(config, renderer)
    }

    /// Create an editor that paints through `renderer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_renderer(config: EditorConfig, renderer: Renderer) -> AppResult<Self> {
        let gestures = GestureEngine::new(config.gesture_config()?);
        let drawer = ToolDrawer::new(config.catalog.clone());
        Ok(Self {
            config,
            store: SceneStore::new(),
            gestures,
            drawer,
            renderer,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read access to the scene store.
    #[must_use]
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// The tool drawer.
    #[must_use]
    pub fn drawer(&self) -> &ToolDrawer {
        &self.drawer
    }

    /// The gesture engine.
    #[must_use]
    pub fn gestures(&self) -> &GestureEngine {
        &self.gestures
    }

    /// Register a callback run after every scene change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SceneChange<'_>) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Remove a scene change callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Feed a raw pointer event.
    ///
    /// Presses are hit tested against the frame currently on screen; moves,
    /// releases and cancels go to whatever gesture is active.
    pub fn pointer(
        &mut self,
        phase: PointerPhase,
        pointer_id: u32,
        x: f32,
        y: f32,
    ) -> GestureEffect {
        let mut event = PointerEvent::new(phase, pointer_id, x, y);
        if phase == PointerPhase::Down {
            event = event.with_target(hit_test(&self.frame(), x, y));
        }
        self.dispatch(&event)
    }

    /// Feed a pointer event whose target is already resolved.
    pub fn dispatch(&mut self, event: &PointerEvent) -> GestureEffect {
        let effect = self.gestures.handle(&mut self.store, event);
        debug!(?effect, "Pointer {:?} at ({}, {})", event.phase, event.x, event.y);
        effect
    }

    /// Replace the text of a text item or the label of a link.
    pub fn edit_text(&mut self, id: ItemId, content: &str) -> bool {
        self.store.update_item(id, &ItemPatch::content(content))
    }

    /// Apply a toolbar action to the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected or the selection does not
    /// offer the control.
    pub fn toolbar(&mut self, action: ToolbarAction) -> EditorResult<bool> {
        action.apply(&mut self.store)
    }

    // ------------------------------------------------------------------
    // Drawer
    // ------------------------------------------------------------------

    /// Expand or collapse the drawer.
    pub fn toggle_drawer(&mut self) -> bool {
        self.drawer.toggle()
    }

    /// Add a default text item.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn add_text(&mut self) -> EditorResult<ItemId> {
        self.drawer.add_text(&mut self.store)
    }

    /// Start picking an image item.
    pub fn request_image_upload(&mut self) -> UploadRequest {
        self.drawer.request_image_upload()
    }

    /// Start picking a background image.
    pub fn request_background_upload(&mut self) -> UploadRequest {
        self.drawer.request_background_upload()
    }

    /// Finish an upload with the host's file read result.
    ///
    /// # Errors
    ///
    /// Returns an error if the read failed or the file is not an image.
    pub fn complete_upload(
        &mut self,
        request: UploadRequest,
        read: Result<FilePayload, String>,
    ) -> EditorResult<UploadOutcome> {
        self.drawer.complete_upload(&mut self.store, request, read)
    }

    /// Open the link modal.
    pub fn open_link_dialog(&mut self) -> &mut LinkDialog {
        self.drawer.open_link_dialog()
    }

    /// Dismiss the link modal.
    pub fn cancel_link_dialog(&mut self) {
        self.drawer.cancel_link_dialog();
    }

    /// Add the link from the modal.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal is closed or its URL is empty.
    pub fn confirm_link(&mut self) -> EditorResult<ItemId> {
        self.drawer.confirm_link(&mut self.store)
    }

    /// Use a solid background color.
    ///
    /// # Errors
    ///
    /// Returns an error if `color` is empty or not a CSS color.
    pub fn set_background_color(&mut self, color: &str) -> EditorResult<bool> {
        self.drawer.set_background_color(&mut self.store, color)
    }

    /// Use a preset background image.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a preset.
    pub fn choose_background_preset(&mut self, url: &str) -> EditorResult<bool> {
        self.drawer.choose_background_preset(&mut self.store, url)
    }

    /// Add a preset sticker.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a preset.
    pub fn add_sticker(&mut self, url: &str) -> EditorResult<ItemId> {
        self.drawer.add_sticker(&mut self.store, url)
    }

    /// Ask to clear the canvas.
    pub fn request_clear(&mut self) -> ClearRequest {
        self.drawer.request_clear()
    }

    /// Carry out a confirmed clear.
    pub fn confirm_clear(&mut self, request: ClearRequest) -> bool {
        request.confirm(&mut self.store)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// The frame as currently seen, including any live drag offset.
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.renderer.frame(self.store.scene(), self.gestures.drag_preview())
    }

    /// Paint the current frame and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn render(&mut self) -> AppResult<Frame> {
        Ok(self
            .renderer
            .render(self.store.scene(), self.gestures.drag_preview())?)
    }

    /// Paint the current frame and return its HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn render_html(&mut self) -> AppResult<String> {
        let frame = self.render()?;
        match self.renderer.markup() {
            Some(markup) => Ok(markup.to_string()),
            None => Ok(advent_renderer::backend::html::to_html(&frame)?),
        }
    }

    /// Number of scene changes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Snapshot of the scene for saving.
    #[must_use]
    pub fn document(&self) -> SceneDocument {
        self.store.document()
    }

    /// Replace the scene with `document`, dropping any active gesture.
    ///
    /// # Errors
    ///
    /// Returns an error if the document version is unsupported.
    pub fn load_document(&mut self, document: SceneDocument) -> EditorResult<()> {
        self.store.load(document)?;
        self.gestures = GestureEngine::new(*self.gestures.config());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Save the canvas as day `day` of `token`, returning the document URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the day is out of range or the upload fails.
    pub async fn save_day<S: ObjectStore>(
        &self,
        repo: &CalendarRepository<S>,
        token: &CalendarToken,
        day: u8,
    ) -> AppResult<String> {
        let document = self.document();
        Ok(repo.save_day(token, day, &document).await?)
    }

    /// Load day `day` of `token`. A day never saved opens as an empty canvas.
    ///
    /// Returns whether a saved document was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the day is out of range or the saved document has
    /// an unsupported version.
    pub async fn load_day<S: ObjectStore>(
        &mut self,
        repo: &CalendarRepository<S>,
        token: &CalendarToken,
        day: u8,
    ) -> AppResult<bool> {
        let saved = repo.load_day(token, day).await?;
        let found = saved.is_some();
        self.load_document(saved.unwrap_or_default())?;
        info!(
            "Opened day {day} of calendar {token} ({} items)",
            self.store.scene().item_count()
        );
        Ok(found)
    }
}
