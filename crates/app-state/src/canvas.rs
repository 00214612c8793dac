//! Contract with the external 2D canvas: what the editor hands a renderer,
//! and the events the canvas reports back.

use cs_common::{Element, ElementId};

/// Draws the scene. Implemented by whatever scene-graph library hosts the canvas.
pub trait CanvasRenderer {
    /// Draw `elements` in paint order (first is bottom-most). `selected`
    /// marks the element that gets the transformer handles.
    fn render(&mut self, elements: &[Element], selected: Option<&ElementId>);
}

/// User interaction reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// Click on an element.
    Select(ElementId),
    /// Click on empty canvas area.
    Deselect,
    DragEnd {
        id: ElementId,
        x: f64,
        y: f64,
    },
    /// End of a resize/rotate gesture. Size is already scaled into
    /// width/height (the canvas resets its scale factors to 1).
    TransformEnd {
        id: ElementId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
    },
}

impl CanvasEvent {
    /// The element the event targets, if any.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            CanvasEvent::Select(id)
            | CanvasEvent::DragEnd { id, .. }
            | CanvasEvent::TransformEnd { id, .. } => Some(id),
            CanvasEvent::Deselect => None,
        }
    }
}

/// A renderer that keeps the last frame it was given. Useful for headless
/// hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: usize,
    pub last_elements: Vec<Element>,
    pub last_selected: Option<ElementId>,
}

impl CanvasRenderer for RecordingRenderer {
    fn render(&mut self, elements: &[Element], selected: Option<&ElementId>) {
        self.frames += 1;
        self.last_elements = elements.to_vec();
        self.last_selected = selected.cloned();
    }
}
