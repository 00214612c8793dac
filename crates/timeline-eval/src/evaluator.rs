//! Scene evaluation: `evaluate()` takes the element list and a time and
//! produces the interpolated elements in paint order for the canvas.
//!
//! 1. Resolve the stacking order (explicit `zIndex`, else insertion index).
//! 2. Interpolate each element's keyframes at the given time.
//!
//! The timeline panel view (`timeline_lanes`) is derived from the same order.

use cs_common::{Element, ElementId, TimeCode};
use serde::Serialize;

use crate::keyframe::interpolate;

/// Elements in paint order, back to front.
///
/// An element's effective z is its `zIndex` when set, otherwise its position
/// in the store. Ties keep store order.
pub fn stacking_order(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<(i64, usize, &Element)> = elements
        .iter()
        .enumerate()
        .map(|(idx, el)| (el.z_index.unwrap_or(idx as i64), idx, el))
        .collect();
    ordered.sort_by_key(|&(z, idx, _)| (z, idx));
    ordered.into_iter().map(|(_, _, el)| el).collect()
}

/// Evaluate the scene at `time`, producing the elements the canvas draws,
/// back to front.
pub fn evaluate(elements: &[Element], time: TimeCode) -> Vec<Element> {
    let frame: Vec<Element> = stacking_order(elements)
        .into_iter()
        .map(|el| interpolate(el, time))
        .collect();
    tracing::trace!(time = %time, elements = frame.len(), "Evaluated scene");
    frame
}

/// One row of the timeline panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLane {
    /// 1-based track number; the topmost element has the highest.
    pub track: usize,
    pub element_id: ElementId,
    /// Capitalized element type, as printed on the lane's bar.
    pub label: String,
    pub start_time: f64,
    pub duration: f64,
    pub keyframe_times: Vec<f64>,
}

impl TimelineLane {
    pub fn track_label(&self) -> String {
        format!("Track {}", self.track)
    }
}

/// Timeline lanes, topmost element first.
pub fn timeline_lanes(elements: &[Element]) -> Vec<TimelineLane> {
    let ordered = stacking_order(elements);
    let count = ordered.len();
    ordered
        .into_iter()
        .rev()
        .enumerate()
        .map(|(row, el)| TimelineLane {
            track: count - row,
            element_id: el.id.clone(),
            label: capitalize(el.element_type().as_str()),
            start_time: el.start_time,
            duration: el.duration,
            keyframe_times: el.keyframes.times(),
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
