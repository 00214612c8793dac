//! Single-element selection.

use cs_common::ElementId;

use crate::state::ElementStore;

/// At most one selected element. The editor keeps it consistent with the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, replacing any previous selection.
    pub fn select(&mut self, id: ElementId) {
        tracing::debug!(element_id = %id, "Selected element");
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            tracing::debug!("Selection cleared");
        }
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Drop the selection if its element is gone from `store`.
    /// Returns `true` if the selection was dropped.
    pub fn retain_existing(&mut self, store: &ElementStore) -> bool {
        match &self.selected {
            Some(id) if !store.contains(id) => {
                tracing::debug!(element_id = %id, "Dropping stale selection");
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}
