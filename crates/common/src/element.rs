//! Element data model.
//!
//! An [`Element`] is a common base (id, geometry, timing, stacking, keyframes)
//! plus an [`ElementKind`] carrying the per-type payload. The JSON form is
//! flat: `{"id": .., "type": "text", "x": .., "text": .., "keyframes": {..}}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PropertyError, PropertyResult};
use crate::keyframes::Keyframes;
use crate::property::{PropertyKey, PropertySet, PropertyValue};
use crate::types::ElementId;

pub const DEFAULT_POSITION: f64 = 100.0;
pub const DEFAULT_SIZE: f64 = 100.0;
pub const DEFAULT_DURATION: f64 = 5.0;
pub const DEFAULT_TEXT: &str = "New Text";
pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_TEXT_FILL: &str = "black";
pub const DEFAULT_SHAPE_FILL: &str = "#3b82f6";

/// Offset applied to both axes when an element is duplicated.
pub const DUPLICATE_OFFSET: f64 = 10.0;

/// The four element variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Shape,
    Image,
    Video,
}

impl ElementType {
    pub const ALL: [ElementType; 4] = [
        ElementType::Text,
        ElementType::Shape,
        ElementType::Image,
        ElementType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Shape => "shape",
            ElementType::Image => "image",
            ElementType::Video => "video",
        }
    }

    /// Image and video elements need an asset decode before they exist.
    pub fn is_media(self) -> bool {
        matches!(self, ElementType::Image | ElementType::Video)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PropertyError::UnknownKey(s.to_string()))
    }
}

/// Per-type payload, tagged by `type` in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default = "default_text")]
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_text_fill")]
        fill: String,
    },
    Shape {
        #[serde(default = "default_shape_fill")]
        fill: String,
    },
    Image {
        #[serde(default)]
        image: String,
    },
    Video {
        #[serde(default)]
        video: String,
    },
}

impl ElementKind {
    /// Default payload for a freshly created element of `element_type`.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => ElementKind::Text {
                text: default_text(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: default_font_family(),
                fill: default_text_fill(),
            },
            ElementType::Shape => ElementKind::Shape {
                fill: default_shape_fill(),
            },
            ElementType::Image => ElementKind::Image {
                image: String::new(),
            },
            ElementType::Video => ElementKind::Video {
                video: String::new(),
            },
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Shape { .. } => ElementType::Shape,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Video { .. } => ElementType::Video,
        }
    }
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}
fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}
fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}
fn default_text_fill() -> String {
    DEFAULT_TEXT_FILL.to_string()
}
fn default_shape_fill() -> String {
    DEFAULT_SHAPE_FILL.to_string()
}
fn default_position() -> f64 {
    DEFAULT_POSITION
}
fn default_size() -> f64 {
    DEFAULT_SIZE
}
fn default_duration() -> f64 {
    DEFAULT_DURATION
}

/// A positioned, timed visual object on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default = "default_position")]
    pub x: f64,
    #[serde(default = "default_position")]
    pub y: f64,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    /// Degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Keyframes::is_empty")]
    pub keyframes: Keyframes,
}

impl Element {
    /// A new element with a fresh id and the construction defaults.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            id: ElementId::generate(),
            name: None,
            kind: ElementKind::default_for(element_type),
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            rotation: 0.0,
            start_time: 0.0,
            duration: DEFAULT_DURATION,
            z_index: None,
            keyframes: Keyframes::new(),
        }
    }

    /// A new image or video element referencing `source`, sized `width` x `height`.
    /// Text and shape types get their default payload and ignore `source`.
    pub fn media(element_type: ElementType, source: String, width: f64, height: f64) -> Self {
        let kind = match element_type {
            ElementType::Image => ElementKind::Image { image: source },
            ElementType::Video => ElementKind::Video { video: source },
            other => ElementKind::default_for(other),
        };
        Self {
            kind,
            width,
            height,
            ..Self::new(element_type)
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Name shown in panels; falls back to the type name.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.element_type().as_str())
    }

    /// Current value of `key`, or `None` when the element's type does not
    /// own it (or an optional field is unset).
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        let num = |v: f64| Some(PropertyValue::Number(v));
        let text = |s: &str| Some(PropertyValue::Text(s.to_string()));
        match (key, &self.kind) {
            (PropertyKey::X, _) => num(self.x),
            (PropertyKey::Y, _) => num(self.y),
            (PropertyKey::Width, _) => num(self.width),
            (PropertyKey::Height, _) => num(self.height),
            (PropertyKey::Rotation, _) => num(self.rotation),
            (PropertyKey::StartTime, _) => num(self.start_time),
            (PropertyKey::Duration, _) => num(self.duration),
            (PropertyKey::ZIndex, _) => self.z_index.and_then(|z| num(z as f64)),
            (PropertyKey::Name, _) => self.name.as_deref().and_then(text),
            (PropertyKey::Text, ElementKind::Text { text: t, .. }) => text(t.as_str()),
            (PropertyKey::FontSize, ElementKind::Text { font_size, .. }) => num(*font_size),
            (PropertyKey::FontFamily, ElementKind::Text { font_family, .. }) => {
                text(font_family.as_str())
            }
            (PropertyKey::Fill, ElementKind::Text { fill, .. })
            | (PropertyKey::Fill, ElementKind::Shape { fill }) => text(fill.as_str()),
            (PropertyKey::Image, ElementKind::Image { image }) => text(image.as_str()),
            (PropertyKey::Video, ElementKind::Video { video }) => text(video.as_str()),
            _ => None,
        }
    }

    /// All properties this element currently holds.
    pub fn properties(&self) -> PropertySet {
        PropertyKey::ALL
            .iter()
            .filter_map(|&key| self.get(key).map(|v| (key, v)))
            .collect()
    }

    /// Validate `props` against this element's type, then merge them.
    /// On error nothing is changed.
    pub fn apply(&mut self, props: &PropertySet) -> PropertyResult<()> {
        props.validate_for(self.element_type())?;
        for (key, value) in props.iter() {
            self.set(key, value);
        }
        Ok(())
    }

    /// Merge whatever entries of `props` fit this element, skipping the rest.
    pub fn merge_lenient(&mut self, props: &PropertySet) {
        for (key, value) in props.iter() {
            if !self.set(key, value) {
                tracing::trace!(element_id = %self.id, %key, "Skipped inapplicable property");
            }
        }
    }

    /// Copy with a fresh id, `" (Copy)"` appended to the display name and the
    /// position nudged by [`DUPLICATE_OFFSET`].
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::generate();
        copy.name = Some(format!("{} (Copy)", self.display_name()));
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy
    }

    fn set(&mut self, key: PropertyKey, value: &PropertyValue) -> bool {
        match value {
            PropertyValue::Number(n) => self.set_number(key, *n),
            PropertyValue::Text(s) => self.set_text(key, s),
        }
    }

    fn set_number(&mut self, key: PropertyKey, n: f64) -> bool {
        let slot = match (key, &mut self.kind) {
            (PropertyKey::X, _) => &mut self.x,
            (PropertyKey::Y, _) => &mut self.y,
            (PropertyKey::Width, _) => &mut self.width,
            (PropertyKey::Height, _) => &mut self.height,
            (PropertyKey::Rotation, _) => &mut self.rotation,
            (PropertyKey::StartTime, _) => &mut self.start_time,
            (PropertyKey::Duration, _) => &mut self.duration,
            (PropertyKey::ZIndex, _) => {
                self.z_index = Some(n.round() as i64);
                return true;
            }
            (PropertyKey::FontSize, ElementKind::Text { font_size, .. }) => font_size,
            _ => return false,
        };
        *slot = n;
        true
    }

    fn set_text(&mut self, key: PropertyKey, s: &str) -> bool {
        let slot = match (key, &mut self.kind) {
            (PropertyKey::Name, _) => {
                self.name = Some(s.to_string());
                return true;
            }
            (PropertyKey::Text, ElementKind::Text { text, .. }) => text,
            (PropertyKey::FontFamily, ElementKind::Text { font_family, .. }) => font_family,
            (PropertyKey::Fill, ElementKind::Text { fill, .. })
            | (PropertyKey::Fill, ElementKind::Shape { fill }) => fill,
            (PropertyKey::Image, ElementKind::Image { image }) => image,
            (PropertyKey::Video, ElementKind::Video { video }) => video,
            _ => return false,
        };
        *slot = s.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_defaults() {
        let el = Element::new(ElementType::Text);
        assert_eq!((el.x, el.y, el.width, el.height), (100.0, 100.0, 100.0, 100.0));
        assert_eq!(el.rotation, 0.0);
        assert_eq!(el.start_time, 0.0);
        assert_eq!(el.duration, 5.0);
        assert_eq!(
            el.get(PropertyKey::Text),
            Some(PropertyValue::Text("New Text".into()))
        );
        assert_eq!(el.get(PropertyKey::FontSize), Some(PropertyValue::Number(20.0)));
        assert_eq!(el.display_name(), "text");
    }

    #[test]
    fn media_constructor_sets_payload_and_size() {
        let el = Element::media(ElementType::Video, "clip.mp4".into(), 200.0, 112.5);
        assert_eq!(el.element_type(), ElementType::Video);
        assert_eq!(
            el.get(PropertyKey::Video).and_then(|v| v.as_text().map(String::from)),
            Some("clip.mp4".to_string())
        );
        assert_eq!(el.height, 112.5);
        assert_eq!(el.get(PropertyKey::Fill), None);
    }

    #[test]
    fn apply_merges_valid_set() {
        let mut el = Element::new(ElementType::Shape);
        el.apply(
            &PropertySet::new()
                .with(PropertyKey::X, 50.0)
                .with(PropertyKey::Fill, "red")
                .with(PropertyKey::ZIndex, 2),
        )
        .unwrap();
        assert_eq!(el.x, 50.0);
        assert_eq!(el.z_index, Some(2));
        assert_eq!(el.get(PropertyKey::Fill), Some(PropertyValue::Text("red".into())));
    }

    #[test]
    fn apply_rejects_whole_set_on_error() {
        let mut el = Element::new(ElementType::Shape);
        let before = el.clone();
        let res = el.apply(
            &PropertySet::new()
                .with(PropertyKey::X, 50.0)
                .with(PropertyKey::FontSize, 30.0),
        );
        assert!(res.is_err());
        assert_eq!(el, before);
    }

    #[test]
    fn merge_lenient_skips_inapplicable() {
        let mut el = Element::new(ElementType::Image);
        el.merge_lenient(
            &PropertySet::new()
                .with(PropertyKey::Y, 7.0)
                .with(PropertyKey::Text, "ignored"),
        );
        assert_eq!(el.y, 7.0);
        assert_eq!(el.get(PropertyKey::Text), None);
    }

    #[test]
    fn duplicate_gets_new_id_and_offset() {
        let mut el = Element::new(ElementType::Text);
        el.name = Some("Title".into());
        let copy = el.duplicate();
        assert_ne!(copy.id, el.id);
        assert_eq!(copy.name.as_deref(), Some("Title (Copy)"));
        assert_eq!(copy.x, el.x + 10.0);
        assert_eq!(copy.y, el.y + 10.0);

        let unnamed = Element::new(ElementType::Shape).duplicate();
        assert_eq!(unnamed.display_name(), "shape (Copy)");
    }

    #[test]
    fn json_is_flat_and_tagged() {
        let mut el = Element::new(ElementType::Shape);
        el.id = ElementId::new("a");
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "shape");
        assert_eq!(value["fill"], "#3b82f6");
        assert_eq!(value["startTime"], 0.0);
        assert!(value.get("keyframes").is_none());
        assert!(value.get("zIndex").is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let el: Element = serde_json::from_str(r#"{"id": "t1", "type": "text"}"#).unwrap();
        assert_eq!(el.x, 100.0);
        assert_eq!(el.duration, 5.0);
        assert_eq!(el.get(PropertyKey::FontFamily), Some(PropertyValue::Text("Arial".into())));
    }

    #[test]
    fn roundtrip_with_keyframes() {
        let mut el = Element::new(ElementType::Text);
        el.z_index = Some(3);
        el.keyframes
            .upsert(0.0, &PropertySet::new().with(PropertyKey::X, 0.0))
            .unwrap();
        el.keyframes
            .upsert(2.0, &PropertySet::new().with(PropertyKey::X, 100.0))
            .unwrap();
        let json = serde_json::to_string(&el).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn element_type_parse() {
        assert_eq!("video".parse::<ElementType>().unwrap(), ElementType::Video);
        assert!("circle".parse::<ElementType>().is_err());
        assert!(ElementType::Image.is_media());
        assert!(!ElementType::Text.is_media());
    }
}
