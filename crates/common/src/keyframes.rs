//! Sparse time -> property-set keyframe container.
//!
//! Entries are kept sorted by numeric time at all times, whatever order they
//! were written or parsed in. On the wire the container is a JSON object keyed
//! by the decimal time (`{"0": {...}, "2.5": {...}}`).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::element::ElementType;
use crate::error::{PropertyError, PropertyResult};
use crate::property::PropertySet;

/// A single keyframe: property overrides at a point in time (seconds).
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub properties: PropertySet,
}

/// Keyframes of one element, sorted ascending by time, unique times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframes(Vec<Keyframe>);

impl Keyframes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.0.iter()
    }

    /// Keyframe times in ascending numeric order.
    pub fn times(&self) -> Vec<f64> {
        self.0.iter().map(|k| k.time).collect()
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.0.last()
    }

    pub fn get(&self, time: f64) -> Option<&PropertySet> {
        self.0.iter().find(|k| k.time == time).map(|k| &k.properties)
    }

    /// Merge `properties` into the keyframe at `time`, creating it if absent.
    /// Properties already stored at that time and not named in `properties`
    /// are kept.
    pub fn upsert(&mut self, time: f64, properties: &PropertySet) -> PropertyResult<()> {
        if !time.is_finite() {
            return Err(PropertyError::InvalidTime(time.to_string()));
        }
        match self.0.binary_search_by(|k| k.time.total_cmp(&time)) {
            Ok(idx) => self.0[idx].properties.merge(properties),
            Err(idx) => self.0.insert(
                idx,
                Keyframe {
                    time,
                    properties: properties.clone(),
                },
            ),
        }
        Ok(())
    }

    /// Remove the keyframe at exactly `time`.
    pub fn remove(&mut self, time: f64) -> Option<PropertySet> {
        let idx = self.0.iter().position(|k| k.time == time)?;
        Some(self.0.remove(idx).properties)
    }

    /// Check every keyframe entry against the properties `element_type` owns.
    pub fn validate_for(&self, element_type: ElementType) -> PropertyResult<()> {
        self.0
            .iter()
            .try_for_each(|k| k.properties.validate_for(element_type))
    }
}

/// Format a keyframe time as its JSON object key (`2.0` -> `"2"`).
pub fn time_key(time: f64) -> String {
    format!("{time}")
}

impl Serialize for Keyframes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for kf in &self.0 {
            map.serialize_entry(&time_key(kf.time), &kf.properties)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Keyframes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, PropertySet>::deserialize(deserializer)?;
        let mut keyframes = Keyframes::new();
        for (key, properties) in raw {
            let time: f64 = key
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(InvalidTimeKey(&key)))?;
            if keyframes.get(time).is_some() {
                return Err(de::Error::custom(DuplicateTimeKey(&key)));
            }
            keyframes
                .upsert(time, &properties)
                .map_err(de::Error::custom)?;
        }
        Ok(keyframes)
    }
}

struct InvalidTimeKey<'a>(&'a str);

impl fmt::Display for InvalidTimeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid keyframe time '{}'", self.0)
    }
}

struct DuplicateTimeKey<'a>(&'a str);

impl fmt::Display for DuplicateTimeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate keyframe time '{}'", self.0)
    }
}
