//! # Advent Canvas Storage
//!
//! Persists calendars and their 24 day canvases as JSON objects.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │   CalendarRepository  (tokens, day paths)   │
//! ├─────────────────────────────────────────────┤
//! │   ObjectStore trait                         │
//! ├──────────────────────┬──────────────────────┤
//! │   Supabase Storage   │   In-memory          │
//! │   (reqwest)          │   (tests, offline)   │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calendar;
pub mod config;
pub mod error;
pub mod object_store;
pub mod supabase;

pub use calendar::{
    day_folder, CalendarManifest, CalendarRepository, CalendarToken, CALENDAR_FILE, DAYS,
    DAY_MANIFEST_FILE,
};
pub use config::{StorageConfig, DEFAULT_BUCKET};
pub use error::{StorageError, StorageResult};
pub use object_store::{MemoryObjectStore, ObjectStore};
pub use supabase::SupabaseObjectStore;

/// Storage crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
