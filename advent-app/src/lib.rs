//! # Advent Canvas Editor Host
//!
//! Wires the scene store, gesture engine, tool drawer, renderer and calendar
//! storage into one editor for a single day's canvas.
//!
//! ```text
//!   pointer / text / toolbar / drawer input
//!                   │
//!                   ▼
//!   ┌───────────────────────────────────┐      ┌──────────────────┐
//!   │ EditorApp                         │─────▶│ CalendarRepository│
//!   │  SceneStore ◀── GestureEngine     │ save │  (advent-storage) │
//!   │      │          ToolDrawer        │ load └──────────────────┘
//!   │      ▼                            │
//!   │  Renderer ──▶ Frame ──▶ HTML/DOM  │
//!   └───────────────────────────────────┘
//! ```
//!
//! ## Hosts
//!
//! - `cli` (default): the `advent-canvas` binary
//! - `wasm`: browser bindings, build with
//!   `wasm-pack build --target web advent-app -- --no-default-features --features wasm`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
#[cfg(feature = "cli")]
pub mod telemetry;
pub mod tickets;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{EditorConfig, DRAG_THRESHOLD_VAR, HANDLE_SIZE_VAR};
pub use editor::EditorApp;
pub use error::{AppError, AppResult};
pub use tickets::TicketBook;

/// Editor host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
