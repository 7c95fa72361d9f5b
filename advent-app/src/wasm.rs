//! WASM bindings for the browser editor.
//!
//! ```javascript
//! import init, { WasmEditor } from './pkg/advent_app.js';
//!
//! await init();
//! const editor = new WasmEditor('canvas-area');
//! canvas.addEventListener('pointerdown', (e) =>
//!     editor.pointerEvent('down', e.pointerId, e.offsetX, e.offsetY));
//! function frame() {
//!     editor.render();
//!     requestAnimationFrame(frame);
//! }
//! frame();
//! ```

use advent_core::{
    ClearRequest, FilePayload, ItemId, PointerPhase, SceneDocument, ToolbarAction, UploadRequest,
};
use advent_renderer::{BackendType, Renderer, RendererConfig};
use advent_storage::{CalendarRepository, CalendarToken, StorageConfig, SupabaseObjectStore};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::{EditorApp, EditorConfig, TicketBook};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Advent Canvas WASM initialized");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_id(id: &str) -> Result<ItemId, JsValue> {
    ItemId::parse(id).map_err(|e| js_error(format!("invalid item id {id:?}: {e}")))
}

/// Browser-facing editor. Complex values cross the boundary as JSON strings.
#[wasm_bindgen]
pub struct WasmEditor {
    app: EditorApp,
    uploads: TicketBook<UploadRequest>,
    clears: TicketBook<ClearRequest>,
    storage: Option<SupabaseObjectStore>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor painting into the element with id `mount_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(mount_id: &str) -> Result<WasmEditor, JsValue> {
        let config = EditorConfig::default();
        let renderer = Renderer::new(RendererConfig {
            preferred_backend: BackendType::Dom,
            mount_id: mount_id.to_string(),
            ..config.renderer_config()
        })
        .map_err(js_error)?;
        let app = EditorApp::with_renderer(config, renderer).map_err(js_error)?;
        Ok(Self {
            app,
            uploads: TicketBook::new(),
            clears: TicketBook::new(),
            storage: None,
        })
    }

    /// Paint the current frame.
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.app.render().map(|_| ()).map_err(js_error)
    }

    /// Feed a pointer event; `phase` is `down`, `move`, `up` or `cancel`.
    /// Returns the gesture effect as JSON.
    #[wasm_bindgen(js_name = pointerEvent)]
    pub fn pointer_event(
        &mut self,
        phase: &str,
        pointer_id: u32,
        x: f32,
        y: f32,
    ) -> Result<String, JsValue> {
        let phase: PointerPhase =
            serde_json::from_value(serde_json::Value::from(phase)).map_err(js_error)?;
        let effect = self.app.pointer(phase, pointer_id, x, y);
        serde_json::to_string(&effect).map_err(js_error)
    }

    /// Replace the text of an item.
    #[wasm_bindgen(js_name = editText)]
    pub fn edit_text(&mut self, id: &str, content: &str) -> Result<bool, JsValue> {
        Ok(self.app.edit_text(parse_id(id)?, content))
    }

    /// Apply a toolbar action given as JSON, e.g. `{"action":"set_color","value":"#fff"}`.
    #[wasm_bindgen(js_name = toolbarAction)]
    pub fn toolbar_action(&mut self, json: &str) -> Result<bool, JsValue> {
        let action: ToolbarAction = serde_json::from_str(json).map_err(js_error)?;
        self.app.toolbar(action).map_err(js_error)
    }

    /// Expand or collapse the drawer.
    #[wasm_bindgen(js_name = toggleDrawer)]
    pub fn toggle_drawer(&mut self) -> bool {
        self.app.toggle_drawer()
    }

    /// Add a text item, returning its id.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> Result<String, JsValue> {
        self.app
            .add_text()
            .map(|id| id.to_string())
            .map_err(js_error)
    }

    /// Add a preset sticker, returning its id.
    #[wasm_bindgen(js_name = addSticker)]
    pub fn add_sticker(&mut self, url: &str) -> Result<String, JsValue> {
        self.app
            .add_sticker(url)
            .map(|id| id.to_string())
            .map_err(js_error)
    }

    /// Open a ticket for an image item upload.
    #[wasm_bindgen(js_name = requestImageUpload)]
    pub fn request_image_upload(&mut self) -> u32 {
        let request = self.app.request_image_upload();
        self.uploads.issue(request)
    }

    /// Open a ticket for a background upload.
    #[wasm_bindgen(js_name = requestBackgroundUpload)]
    pub fn request_background_upload(&mut self) -> u32 {
        let request = self.app.request_background_upload();
        self.uploads.issue(request)
    }

    /// Finish an upload with the file's bytes. Returns the outcome as JSON.
    #[wasm_bindgen(js_name = completeUpload)]
    pub fn complete_upload(
        &mut self,
        ticket: u32,
        bytes: Vec<u8>,
        mime: Option<String>,
    ) -> Result<String, JsValue> {
        let request = self.take_upload(ticket)?;
        let payload = FilePayload { bytes, mime };
        let outcome = self
            .app
            .complete_upload(request, Ok(payload))
            .map_err(js_error)?;
        serde_json::to_string(&outcome).map_err(js_error)
    }

    /// Abandon an upload whose file could not be read.
    #[wasm_bindgen(js_name = failUpload)]
    pub fn fail_upload(&mut self, ticket: u32, message: &str) -> Result<(), JsValue> {
        let request = self.take_upload(ticket)?;
        self.app
            .complete_upload(request, Err(message.to_string()))
            .map(|_| ())
            .map_err(js_error)
    }

    /// Open the link modal.
    #[wasm_bindgen(js_name = openLinkDialog)]
    pub fn open_link_dialog(&mut self) {
        self.app.open_link_dialog();
    }

    /// Fill in the link modal.
    #[wasm_bindgen(js_name = setLinkDialog)]
    pub fn set_link_dialog(&mut self, url: &str, label: &str) {
        let dialog = self.app.open_link_dialog();
        dialog.url = url.to_string();
        dialog.label = label.to_string();
    }

    /// Add the link from the modal, returning its id.
    #[wasm_bindgen(js_name = confirmLink)]
    pub fn confirm_link(&mut self) -> Result<String, JsValue> {
        self.app
            .confirm_link()
            .map(|id| id.to_string())
            .map_err(js_error)
    }

    /// Dismiss the link modal.
    #[wasm_bindgen(js_name = cancelLinkDialog)]
    pub fn cancel_link_dialog(&mut self) {
        self.app.cancel_link_dialog();
    }

    /// Use a solid background color.
    #[wasm_bindgen(js_name = setBackgroundColor)]
    pub fn set_background_color(&mut self, color: &str) -> Result<bool, JsValue> {
        self.app.set_background_color(color).map_err(js_error)
    }

    /// Use a preset background image.
    #[wasm_bindgen(js_name = chooseBackground)]
    pub fn choose_background(&mut self, url: &str) -> Result<bool, JsValue> {
        self.app.choose_background_preset(url).map_err(js_error)
    }

    /// Ask to clear the canvas. Nothing changes until the returned ticket is
    /// passed to `confirmClear`.
    #[wasm_bindgen(js_name = requestClear)]
    pub fn request_clear(&mut self) -> u32 {
        let request = self.app.request_clear();
        self.clears.issue(request)
    }

    /// Clear the canvas after the user agreed. Returns whether anything was removed.
    #[wasm_bindgen(js_name = confirmClear)]
    pub fn confirm_clear(&mut self, ticket: u32) -> Result<bool, JsValue> {
        let request = self
            .clears
            .take(ticket)
            .ok_or_else(|| js_error(format!("unknown clear ticket {ticket}")))?;
        Ok(self.app.confirm_clear(request))
    }

    /// Drop a clear request the user declined.
    #[wasm_bindgen(js_name = cancelClear)]
    pub fn cancel_clear(&mut self, ticket: u32) {
        if let Some(request) = self.clears.take(ticket) {
            request.cancel();
        }
    }

    /// Scene document as JSON.
    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        self.app.document().to_json().map_err(js_error)
    }

    /// Replace the scene with a JSON scene document.
    #[wasm_bindgen(js_name = loadDocumentJson)]
    pub fn load_document_json(&mut self, json: &str) -> Result<(), JsValue> {
        let document = SceneDocument::from_json(json).map_err(js_error)?;
        self.app.load_document(document).map_err(js_error)
    }

    /// Current frame as JSON, for debugging overlays.
    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.app.frame()).map_err(js_error)
    }

    /// Number of scene changes so far.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn revision(&self) -> f64 {
        self.app.revision() as f64
    }

    /// Configure Supabase Storage for save and load.
    #[wasm_bindgen(js_name = connectStorage)]
    pub fn connect_storage(&mut self, url: &str, anon_key: &str, bucket: &str) -> Result<(), JsValue> {
        let config = StorageConfig::new(url, anon_key, bucket).map_err(js_error)?;
        self.storage = Some(SupabaseObjectStore::new(config).map_err(js_error)?);
        Ok(())
    }

    /// Save the canvas as a day. Resolves to the document URL.
    #[wasm_bindgen(js_name = saveDay)]
    pub fn save_day(&self, token: &str, day: u8) -> Result<Promise, JsValue> {
        let repo = self.repository()?;
        let token = CalendarToken::parse(token).map_err(js_error)?;
        let document = self.app.document();
        Ok(future_to_promise(async move {
            repo.save_day(&token, day, &document)
                .await
                .map(|url| JsValue::from_str(&url))
                .map_err(js_error)
        }))
    }

    /// Fetch a day. Resolves to scene document JSON for `loadDocumentJson`;
    /// a day never saved resolves to an empty document.
    #[wasm_bindgen(js_name = fetchDay)]
    pub fn fetch_day(&self, token: &str, day: u8) -> Result<Promise, JsValue> {
        let repo = self.repository()?;
        let token = CalendarToken::parse(token).map_err(js_error)?;
        Ok(future_to_promise(async move {
            let document = repo
                .load_day(&token, day)
                .await
                .map_err(js_error)?
                .unwrap_or_default();
            document
                .to_json()
                .map(|json| JsValue::from_str(&json))
                .map_err(js_error)
        }))
    }
}

impl WasmEditor {
    fn take_upload(&mut self, ticket: u32) -> Result<UploadRequest, JsValue> {
        self.uploads
            .take(ticket)
            .ok_or_else(|| js_error(format!("unknown upload ticket {ticket}")))
    }

    fn repository(&self) -> Result<CalendarRepository<SupabaseObjectStore>, JsValue> {
        self.storage
            .clone()
            .map(CalendarRepository::new)
            .ok_or_else(|| js_error("storage not connected"))
    }
}
