//! `cs-app-state` -- Editor state management for the Canvas Studio core.
//!
//! This crate provides:
//!
//! - **`Editor`**: Single owner of the element store; every editor operation goes through it.
//! - **`ElementStore`**: Ordered, id-unique element list.
//! - **`HistoryManager`**: Snapshot-based linear undo/redo with a cursor.
//! - **`StoreSnapshot`**: Deep copy of the store held by history entries.
//! - **`Selection`**: The single selected element.
//! - **`PlaybackClock`**: Play/pause/seek and per-frame advance with wrap-around.
//! - **`VersionLog`**: Named version snapshots with bounded auto-saves.
//! - **`CanvasRenderer`** / **`CanvasEvent`**: Contract with the external canvas.
//!
//! # Architecture
//!
//! ```text
//! Editor
//! ├── store: ElementStore          (source of truth)
//! ├── history: HistoryManager      (store snapshots + cursor)
//! ├── selection: Selection         (consistent with store)
//! ├── playback: PlaybackClock      (current time for interpolation)
//! ├── versions: VersionLog         (manual + auto-save snapshots)
//! └── autosave: AutoSaveTimer      (runs while mounted)
//! ```

pub mod canvas;
pub mod editor;
pub mod error;
pub mod history;
pub mod playback;
pub mod selection;
pub mod snapshot;
pub mod state;
pub mod versions;

// Re-export primary types at crate root for convenience.
pub use canvas::{CanvasEvent, CanvasRenderer, RecordingRenderer};
pub use editor::{Editor, PendingMedia, REWIND_STEP_SECS};
pub use error::{EditorError, EditorResult};
pub use history::{HistoryEntry, HistoryManager};
pub use playback::{PlaybackClock, PlaybackMode};
pub use selection::Selection;
pub use snapshot::StoreSnapshot;
pub use state::ElementStore;
pub use versions::{diff_elements, ElementChange, VersionDiff, VersionLog, VersionSnapshot};
