//! `fc-project` — Project model, snapshot history, and persistence for the
//! Framecut engine.
//!
//! This crate provides:
//!
//! - **`Project`**: the single source of truth — typed tracks and clips,
//!   mutated only through validated command methods.
//! - **`ClipData` / `ParamUpdate`**: per-kind parameter structs and typed
//!   single-field updates (no stringly `data[key]` access).
//! - **`Snapshot`**: immutable deep copy of project state.
//! - **`HistoryManager`**: bounded snapshot-based undo/redo.
//! - **save/load**: JSON persistence with atomic writes.
//!
//! # Architecture
//!
//! ```text
//! Project (live state)
//! ├── tracks: Vec<Track>            (compositing order, bottom first)
//! │   └── clips: Vec<Clip>          (insertion order, typed ClipData)
//! └── name / fps / duration_frames
//!
//! HistoryManager
//! ├── undo_stack: Vec<Snapshot>     (pre-mutation states, capped)
//! └── redo_stack: Vec<Snapshot>     (undone states)
//! ```

pub mod error;
pub mod history;
pub mod load;
pub mod model;
pub mod save;
pub mod snapshot;
pub mod types;

// Re-export primary types at crate root for convenience.
pub use error::{ProjectError, ProjectResult};
pub use history::{HistoryManager, DEFAULT_HISTORY_CAP};
pub use load::{from_json_string, load_latest, load_snapshot};
pub use model::{NewClip, Project};
pub use save::{save_snapshot, storage_key, to_json_string, to_json_string_compact};
pub use snapshot::Snapshot;
pub use types::{
    AudioParams, Clip, ClipData, ParamUpdate, StickerParams, TextParams, Track, TrackKind,
    VideoParams,
};
