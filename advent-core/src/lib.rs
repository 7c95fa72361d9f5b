//! # Advent Canvas Core
//!
//! Editor logic for one day of an advent calendar: a free-form canvas of
//! text, image, and link items over a background.
//! Compiles to WASM for the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               advent-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Tool Drawer     │  Contextual Toolbar      │
//! │  - Add items     │  - Font / color / style  │
//! │  - Uploads       │  - Z-order, delete       │
//! │  - Background    │                          │
//! ├─────────────────────────────────────────────┤
//! │  Gesture Engine  (Idle/Armed/Drag/Resize)   │
//! ├─────────────────────────────────────────────┤
//! │  Scene Store     │  Scene Document          │
//! │  - Paint order   │  - JSON manifest         │
//! │  - Selection     │                          │
//! │  - Revisions     │                          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`SceneStore`]; nothing else holds item state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data_uri;
pub mod drawer;
pub mod error;
pub mod event;
pub mod gesture;
pub mod item;
pub mod scene;
pub mod schema;
pub mod store;
pub mod toolbar;
pub mod validate;

pub use drawer::{
    AssetCatalog, ClearRequest, FilePayload, LinkDialog, ToolDrawer, UploadOutcome,
    UploadRequest, UploadTarget,
};
pub use error::{EditorError, EditorResult};
pub use event::{HitTarget, PointerEvent, PointerPhase};
pub use gesture::{
    DragPreview, GestureConfig, GestureEffect, GestureEngine, GestureState, NoopReason,
    DEFAULT_DRAG_THRESHOLD,
};
pub use item::{
    create_image, create_link, create_sticker, create_text, Background, FontStyle, FontWeight,
    ImageItem, ItemId, ItemKind, ItemPatch, LinkItem, Position, SceneItem, Size, TextItem,
    DEFAULT_FONT_FAMILY, DEFAULT_LINK_LABEL, DEFAULT_TEXT_CONTENT, IMAGE_MIN_SIZE, LINK_MIN_SIZE,
};
pub use scene::Scene;
pub use schema::{SceneDocument, SCENE_DOCUMENT_VERSION};
pub use store::{Mutation, SceneChange, SceneStore, SubscriptionId};
pub use toolbar::{ToolbarAction, ToolbarControl, ToolbarState, FONT_FAMILIES};
pub use validate::{is_css_color, is_safe_image_src, is_safe_link_url, LINK_SCHEMES};

/// Editor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
