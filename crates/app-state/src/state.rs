//! Element store: the ordered, id-unique element list.
//!
//! Store order is the default stacking order. The store does not record
//! history itself; the `Editor` records one entry per mutation.

use cs_common::{Element, ElementId};

/// Ordered element list, unique by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    /// Find an element by ID.
    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Find an element by ID (mutable).
    pub fn find_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Append an element on top of the stack. An element whose id is already
    /// present is rejected and handed back.
    pub fn push(&mut self, element: Element) -> Result<(), Element> {
        if self.contains(&element.id) {
            tracing::warn!(element_id = %element.id, "Refusing duplicate element id");
            return Err(element);
        }
        tracing::debug!(
            element_id = %element.id,
            element_type = %element.element_type(),
            "Adding element"
        );
        self.elements.push(element);
        Ok(())
    }

    /// Remove an element by ID. Returns the removed element, or None if not found.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let pos = self.index_of(id)?;
        let element = self.elements.remove(pos);
        tracing::debug!(element_id = %id, "Removed element");
        Some(element)
    }

    /// Replace the whole list. Callers guarantee unique ids.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        tracing::debug!(
            before = self.elements.len(),
            after = elements.len(),
            "Replacing store contents"
        );
        self.elements = elements;
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id.clone()).collect()
    }
}
