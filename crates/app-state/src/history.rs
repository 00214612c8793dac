//! Snapshot-based linear undo/redo history.
//!
//! Every mutation records the store *after* the change. A cursor points at
//! the entry matching the live store:
//! - Recording truncates everything after the cursor, appends, and moves the
//!   cursor to the new last entry.
//! - Undo moves the cursor one step left and hands back that snapshot.
//! - Redo moves it one step right.
//!
//! # Usage
//!
//! ```ignore
//! let mut history = HistoryManager::new(None);
//! history.record("Add text", StoreSnapshot::capture(&store));
//!
//! if let Some(prev) = history.undo() {
//!     prev.restore(&mut store);
//! }
//! ```

use std::time::Instant;

use crate::snapshot::StoreSnapshot;

/// A single entry in the history.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label of the action that produced this state.
    pub label: String,
    pub snapshot: StoreSnapshot,
    pub timestamp: Instant,
}

/// Linear history of store snapshots with a cursor.
#[derive(Debug, Default)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    /// Entry matching the live store; `None` while empty.
    index: Option<usize>,
    /// Oldest entries are dropped past this many.
    max_entries: Option<usize>,
}

impl HistoryManager {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            max_entries,
        }
    }

    /// Record the state after an action.
    pub fn record(&mut self, label: &str, snapshot: StoreSnapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        let discarded = self.entries.len() - keep;
        self.entries.truncate(keep);

        self.entries.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
            timestamp: Instant::now(),
        });
        self.enforce_max();
        self.index = Some(self.entries.len() - 1);

        tracing::debug!(
            label,
            discarded,
            history_len = self.entries.len(),
            "History entry recorded"
        );
    }

    /// Step back. Returns the snapshot to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&StoreSnapshot> {
        let i = self.index.filter(|&i| i > 0)?;
        self.index = Some(i - 1);
        tracing::debug!(label = %self.entries[i].label, index = i - 1, "Undo");
        Some(&self.entries[i - 1].snapshot)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&StoreSnapshot> {
        let i = self.index.filter(|&i| i + 1 < self.entries.len())?;
        self.index = Some(i + 1);
        tracing::debug!(label = %self.entries[i + 1].label, index = i + 1, "Redo");
        Some(&self.entries[i + 1].snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Label of the action that undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.index
            .filter(|&i| i > 0)
            .map(|i| self.entries[i].label.as_str())
    }

    /// Label of the action that redo would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        let next = self.index.map_or(0, |i| i + 1);
        self.entries.get(next).map(|e| e.label.as_str())
    }

    /// Cursor position; `None` while the history is empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Set the cap. Trims the oldest entries if needed.
    pub fn set_max_entries(&mut self, max: Option<usize>) {
        self.max_entries = max;
        self.enforce_max();
    }

    /// Approximate memory held by all snapshots.
    pub fn estimated_size(&self) -> usize {
        self.entries.iter().map(|e| e.snapshot.estimated_size()).sum()
    }

    fn enforce_max(&mut self) {
        let Some(max) = self.max_entries else {
            return;
        };
        let max = max.max(1);
        if self.entries.len() > max {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
            self.index = self.index.map(|i| i.saturating_sub(excess));
        }
    }
}
