//! Property keys, values and partial property sets.
//!
//! A [`PropertySet`] is what flows through `update_element`, keyframe entries
//! and the properties panel. Keys form a closed set so `id` and `type` can
//! never be patched, and every set is checked against the element type before
//! it is merged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::ElementType;
use crate::error::{PropertyError, PropertyResult};

/// A patchable/animatable element property, named as in the JSON format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKey {
    X,
    Y,
    Width,
    Height,
    Rotation,
    StartTime,
    Duration,
    ZIndex,
    Name,
    Text,
    FontSize,
    FontFamily,
    Fill,
    Image,
    Video,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 15] = [
        PropertyKey::X,
        PropertyKey::Y,
        PropertyKey::Width,
        PropertyKey::Height,
        PropertyKey::Rotation,
        PropertyKey::StartTime,
        PropertyKey::Duration,
        PropertyKey::ZIndex,
        PropertyKey::Name,
        PropertyKey::Text,
        PropertyKey::FontSize,
        PropertyKey::FontFamily,
        PropertyKey::Fill,
        PropertyKey::Image,
        PropertyKey::Video,
    ];

    /// JSON field name.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKey::X => "x",
            PropertyKey::Y => "y",
            PropertyKey::Width => "width",
            PropertyKey::Height => "height",
            PropertyKey::Rotation => "rotation",
            PropertyKey::StartTime => "startTime",
            PropertyKey::Duration => "duration",
            PropertyKey::ZIndex => "zIndex",
            PropertyKey::Name => "name",
            PropertyKey::Text => "text",
            PropertyKey::FontSize => "fontSize",
            PropertyKey::FontFamily => "fontFamily",
            PropertyKey::Fill => "fill",
            PropertyKey::Image => "image",
            PropertyKey::Video => "video",
        }
    }

    /// Whether the property holds a number (otherwise a string).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            PropertyKey::X
                | PropertyKey::Y
                | PropertyKey::Width
                | PropertyKey::Height
                | PropertyKey::Rotation
                | PropertyKey::StartTime
                | PropertyKey::Duration
                | PropertyKey::ZIndex
                | PropertyKey::FontSize
        )
    }

    /// Whether elements of `element_type` own this property.
    pub fn applies_to(self, element_type: ElementType) -> bool {
        match self {
            PropertyKey::X
            | PropertyKey::Y
            | PropertyKey::Width
            | PropertyKey::Height
            | PropertyKey::Rotation
            | PropertyKey::StartTime
            | PropertyKey::Duration
            | PropertyKey::ZIndex
            | PropertyKey::Name => true,
            PropertyKey::Text | PropertyKey::FontSize | PropertyKey::FontFamily => {
                element_type == ElementType::Text
            }
            PropertyKey::Fill => {
                matches!(element_type, ElementType::Text | ElementType::Shape)
            }
            PropertyKey::Image => element_type == ElementType::Image,
            PropertyKey::Video => element_type == ElementType::Video,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKey {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PropertyError::UnknownKey(s.to_string()))
    }
}

/// A property value: numbers interpolate, strings step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Number(_) => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Number(f64::from(v))
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

/// A partial set of property overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<PropertyKey, PropertyValue>);

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: PropertyKey, value: impl Into<PropertyValue>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: PropertyKey, value: impl Into<PropertyValue>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.0.get(&key)
    }

    pub fn remove(&mut self, key: PropertyKey) -> Option<PropertyValue> {
        self.0.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `other` into `self`; values in `other` win.
    pub fn merge(&mut self, other: &PropertySet) {
        for (key, value) in other.iter() {
            self.0.insert(key, value.clone());
        }
    }

    /// Check every entry against the properties `element_type` owns.
    pub fn validate_for(&self, element_type: ElementType) -> PropertyResult<()> {
        for (key, value) in self.iter() {
            if !key.applies_to(element_type) {
                return Err(PropertyError::NotApplicable { key, element_type });
            }
            match value {
                PropertyValue::Number(n) => {
                    if !key.is_numeric() {
                        return Err(PropertyError::WrongKind {
                            key,
                            expected: "string",
                        });
                    }
                    if !n.is_finite() {
                        return Err(PropertyError::WrongKind {
                            key,
                            expected: "finite number",
                        });
                    }
                    if key == PropertyKey::ZIndex && n.fract() != 0.0 {
                        return Err(PropertyError::NotIntegral { key, value: *n });
                    }
                }
                PropertyValue::Text(_) => {
                    if key.is_numeric() {
                        return Err(PropertyError::WrongKind {
                            key,
                            expected: "number",
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse a raw text field edit (as typed into a panel input) into a
    /// typed entry. Numeric keys require a parseable number.
    pub fn parse_entry(key: &str, raw: &str) -> PropertyResult<(PropertyKey, PropertyValue)> {
        let key: PropertyKey = key.parse()?;
        if key.is_numeric() {
            let n: f64 = raw
                .trim()
                .parse()
                .map_err(|_| PropertyError::ParseNumber {
                    key,
                    raw: raw.to_string(),
                })?;
            Ok((key, PropertyValue::Number(n)))
        } else {
            Ok((key, PropertyValue::Text(raw.to_string())))
        }
    }
}

impl FromIterator<(PropertyKey, PropertyValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_names() {
        for key in PropertyKey::ALL {
            assert_eq!(key.as_str().parse::<PropertyKey>().unwrap(), key);
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(matches!(
            "type".parse::<PropertyKey>(),
            Err(PropertyError::UnknownKey(_))
        ));
        assert!("id".parse::<PropertyKey>().is_err());
    }

    #[test]
    fn applicability_per_type() {
        assert!(PropertyKey::X.applies_to(ElementType::Video));
        assert!(PropertyKey::Fill.applies_to(ElementType::Text));
        assert!(PropertyKey::Fill.applies_to(ElementType::Shape));
        assert!(!PropertyKey::Fill.applies_to(ElementType::Image));
        assert!(!PropertyKey::FontSize.applies_to(ElementType::Shape));
        assert!(PropertyKey::Image.applies_to(ElementType::Image));
        assert!(!PropertyKey::Image.applies_to(ElementType::Video));
    }

    #[test]
    fn validate_accepts_matching_set() {
        let set = PropertySet::new()
            .with(PropertyKey::X, 10.0)
            .with(PropertyKey::Fill, "#ff0000")
            .with(PropertyKey::ZIndex, 3);
        assert!(set.validate_for(ElementType::Shape).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_kind_and_type() {
        let set = PropertySet::new().with(PropertyKey::X, "left");
        assert!(matches!(
            set.validate_for(ElementType::Shape),
            Err(PropertyError::WrongKind { .. })
        ));

        let set = PropertySet::new().with(PropertyKey::Text, "hi");
        assert!(matches!(
            set.validate_for(ElementType::Shape),
            Err(PropertyError::NotApplicable { .. })
        ));

        let set = PropertySet::new().with(PropertyKey::ZIndex, 1.5);
        assert!(matches!(
            set.validate_for(ElementType::Text),
            Err(PropertyError::NotIntegral { .. })
        ));

        let set = PropertySet::new().with(PropertyKey::Width, f64::NAN);
        assert!(set.validate_for(ElementType::Text).is_err());
    }

    #[test]
    fn merge_overwrites_and_keeps_untouched() {
        let mut base = PropertySet::new()
            .with(PropertyKey::X, 0.0)
            .with(PropertyKey::Y, 5.0);
        base.merge(&PropertySet::new().with(PropertyKey::X, 50.0));
        assert_eq!(base.get(PropertyKey::X), Some(&PropertyValue::Number(50.0)));
        assert_eq!(base.get(PropertyKey::Y), Some(&PropertyValue::Number(5.0)));
    }

    #[test]
    fn deserialize_integers_and_strings() {
        let set: PropertySet = serde_json::from_str(r#"{"x": 100, "fill": "red"}"#).unwrap();
        assert_eq!(set.get(PropertyKey::X), Some(&PropertyValue::Number(100.0)));
        assert_eq!(set.get(PropertyKey::Fill).and_then(|v| v.as_text()), Some("red"));
    }

    #[test]
    fn parse_entry_from_panel_text() {
        let (key, value) = PropertySet::parse_entry("fontSize", " 24 ").unwrap();
        assert_eq!(key, PropertyKey::FontSize);
        assert_eq!(value, PropertyValue::Number(24.0));

        let (_, value) = PropertySet::parse_entry("text", "Hello").unwrap();
        assert_eq!(value.as_text(), Some("Hello"));

        assert!(matches!(
            PropertySet::parse_entry("x", "abc"),
            Err(PropertyError::ParseNumber { .. })
        ));
    }
}
