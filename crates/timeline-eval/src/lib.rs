//! `cs-timeline-eval` -- Keyframe and scene evaluation for the Canvas Studio
//! editor core.
//!
//! - **Keyframe interpolation**: linear for numbers, step for strings
//! - **Stacking order**: explicit `zIndex`, falling back to insertion order
//! - **Timeline lanes**: the per-element rows the timeline panel shows
//!
//! # Usage
//!
//! ```rust
//! use cs_common::{Element, ElementType, PropertyKey, PropertySet, TimeCode};
//! use cs_timeline_eval::interpolate;
//!
//! let mut el = Element::new(ElementType::Text);
//! el.keyframes.upsert(0.0, &PropertySet::new().with(PropertyKey::X, 0.0)).unwrap();
//! el.keyframes.upsert(4.0, &PropertySet::new().with(PropertyKey::X, 400.0)).unwrap();
//! assert_eq!(interpolate(&el, TimeCode::from_secs(2.0)).x, 200.0);
//! ```

pub mod evaluator;
pub mod keyframe;

pub use evaluator::{evaluate, stacking_order, timeline_lanes, TimelineLane};
pub use keyframe::{bracket, evaluate_keyframes, interpolate};
