//! Keyframe interpolation.
//!
//! Given an element and a time, find the keyframes bracketing that time and
//! blend their property sets: numbers are interpolated linearly, strings step
//! (they keep the earlier keyframe's value until the next keyframe is reached).

use cs_common::{Element, Keyframe, Keyframes, PropertySet, PropertyValue, TimeCode};

/// The keyframes around `time`.
///
/// `prev` is the latest keyframe at or before `time` (the earliest one if
/// `time` precedes them all); `next` is the earliest keyframe strictly after
/// `time` (the latest one if none follows). Returns `None` when there are no
/// keyframes.
pub fn bracket(keyframes: &Keyframes, time: f64) -> Option<(&Keyframe, &Keyframe)> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;
    let prev = keyframes
        .iter()
        .take_while(|k| k.time <= time)
        .last()
        .unwrap_or(first);
    let next = keyframes.iter().find(|k| k.time > time).unwrap_or(last);
    Some((prev, next))
}

/// Interpolated property overrides for `keyframes` at `time`.
///
/// Only properties named by the `prev` keyframe are produced. If `next` lacks
/// a numeric property, `prev`'s value is held.
pub fn evaluate_keyframes(keyframes: &Keyframes, time: TimeCode) -> Option<PropertySet> {
    let t = time.as_secs();
    let (prev, next) = bracket(keyframes, t)?;

    if prev.time == next.time {
        return Some(prev.properties.clone());
    }

    let progress = (t - prev.time) / (next.time - prev.time);
    let values = prev
        .properties
        .iter()
        .map(|(key, value)| {
            let blended = match (value, next.properties.get(key)) {
                (PropertyValue::Number(a), Some(PropertyValue::Number(b))) => {
                    PropertyValue::Number(lerp(*a, *b, progress))
                }
                _ => value.clone(),
            };
            (key, blended)
        })
        .collect();
    Some(values)
}

/// The element as it appears at `time`: its keyframe overrides merged on top
/// of the base values. Elements without keyframes come back unchanged.
pub fn interpolate(element: &Element, time: TimeCode) -> Element {
    let mut out = element.clone();
    if let Some(values) = evaluate_keyframes(&element.keyframes, time) {
        out.merge_lenient(&values);
    }
    out
}

/// Linear interpolation.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
