//! Store snapshots for undo/redo.
//!
//! A `StoreSnapshot` is a full deep copy of the element list. History entries
//! own their snapshots, so later edits to the live store never reach them.

use cs_common::Element;

use crate::state::ElementStore;

#[derive(Clone, Debug, PartialEq)]
pub struct StoreSnapshot {
    pub elements: Vec<Element>,
}

impl StoreSnapshot {
    /// Capture a snapshot of the current store.
    pub fn capture(store: &ElementStore) -> Self {
        Self {
            elements: store.as_slice().to_vec(),
        }
    }

    /// Overwrite the store with this snapshot.
    pub fn restore(&self, store: &mut ElementStore) {
        store.replace_all(self.elements.clone());
        tracing::debug!(elements = self.elements.len(), "Snapshot restored");
    }

    /// Rough memory footprint in bytes, for budgeting history depth.
    pub fn estimated_size(&self) -> usize {
        let mut size = std::mem::size_of::<Self>();
        for el in &self.elements {
            size += std::mem::size_of::<Element>();
            size += el.id.as_str().len();
            size += el.name.as_ref().map_or(0, String::len);
            size += el
                .keyframes
                .iter()
                .map(|k| std::mem::size_of::<f64>() + k.properties.len() * 32)
                .sum::<usize>();
        }
        size
    }
}
