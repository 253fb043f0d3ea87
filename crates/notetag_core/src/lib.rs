//! Core domain logic for notetag.
//! This crate owns the note/tag collections, their persistence and the
//! navigation surface consumed by view layers.

pub mod db;
pub mod logging;
pub mod model;
pub mod routing;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NoteData, NoteId, RawNote, ResolvedNote};
pub use model::tag::{Tag, TagId};
pub use routing::{match_route, navigate, Navigation, Route, RouteMatch};
pub use service::notebook_service::{NotebookError, NotebookService};
pub use service::resolve::{filter_notes, resolve_note, resolve_notes, NoteFilter};
pub use store::{
    load_or_default, save_json, KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult,
    NOTES_KEY, TAGS_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
