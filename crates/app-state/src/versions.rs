//! Version snapshot log: named, timestamped copies of the element list.
//!
//! Saves are deduplicated against the most recent snapshot by comparing the
//! compact JSON of the element lists. Auto-saves are bounded: once the log
//! grows past `max_auto_versions`, the oldest auto-save is evicted. Manual
//! saves are never evicted.

use std::collections::BTreeSet;

use cs_common::{iso_timestamp, Element, ElementId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the version log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    /// Creation time in epoch milliseconds; strictly increasing within a log.
    pub id: u64,
    pub name: String,
    pub description: String,
    pub elements: Vec<Element>,
    /// ISO 8601 UTC creation time.
    pub date: String,
    pub is_auto_save: bool,
}

/// Ordered log of version snapshots, oldest first.
#[derive(Clone, Debug)]
pub struct VersionLog {
    versions: Vec<VersionSnapshot>,
    max_auto_versions: usize,
}

impl VersionLog {
    pub fn new(max_auto_versions: usize) -> Self {
        Self {
            versions: Vec::new(),
            max_auto_versions,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionSnapshot> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn latest(&self) -> Option<&VersionSnapshot> {
        self.versions.last()
    }

    pub fn get(&self, id: u64) -> Option<&VersionSnapshot> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Append a snapshot of `elements` taken at `now_ms`.
    ///
    /// Returns the new version's id, or `None` if `elements` serialize to the
    /// same JSON as the latest snapshot.
    pub fn save(&mut self, elements: &[Element], is_auto_save: bool, now_ms: u64) -> Option<u64> {
        if let Some(latest) = self.latest() {
            if same_json(&latest.elements, elements) {
                tracing::debug!(is_auto_save, "Version unchanged, not saved");
                return None;
            }
        }

        let number = self.versions.len() + 1;
        let id = match self.latest() {
            Some(latest) if latest.id >= now_ms => latest.id + 1,
            _ => now_ms,
        };
        let name = if is_auto_save {
            format!("Auto-save {number}")
        } else {
            format!("Version {number}")
        };

        tracing::info!(version_id = id, %name, elements = elements.len(), "Version saved");
        self.versions.push(VersionSnapshot {
            id,
            name,
            description: String::new(),
            elements: elements.to_vec(),
            date: iso_timestamp(id),
            is_auto_save,
        });

        if is_auto_save && self.versions.len() > self.max_auto_versions {
            self.evict_oldest_auto_save(id);
        }
        Some(id)
    }

    /// Remove a version. Returns `false` if no version has this id.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.versions.len();
        self.versions.retain(|v| v.id != id);
        let removed = self.versions.len() != before;
        if removed {
            tracing::debug!(version_id = id, "Version deleted");
        }
        removed
    }

    pub fn rename(&mut self, id: u64, name: &str) -> bool {
        self.with_version(id, |v| v.name = name.to_string())
    }

    pub fn set_description(&mut self, id: u64, description: &str) -> bool {
        self.with_version(id, |v| v.description = description.to_string())
    }

    /// Shallow diff between two versions, or `None` if either id is unknown.
    pub fn compare(&self, from: u64, to: u64) -> Option<VersionDiff> {
        Some(diff_elements(&self.get(from)?.elements, &self.get(to)?.elements))
    }

    fn with_version(&mut self, id: u64, f: impl FnOnce(&mut VersionSnapshot)) -> bool {
        match self.versions.iter_mut().find(|v| v.id == id) {
            Some(version) => {
                f(version);
                tracing::debug!(version_id = id, "Version updated");
                true
            }
            None => false,
        }
    }

    fn evict_oldest_auto_save(&mut self, keep_id: u64) {
        if let Some(pos) = self
            .versions
            .iter()
            .position(|v| v.is_auto_save && v.id != keep_id)
        {
            let evicted = self.versions.remove(pos);
            tracing::debug!(version_id = evicted.id, name = %evicted.name, "Evicted oldest auto-save");
        }
    }
}

fn same_json(a: &[Element], b: &[Element]) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Element-level differences between two versions.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiff {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub modified: Vec<ElementChange>,
}

impl VersionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// An element present in both versions with differing top-level fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementChange {
    pub id: ElementId,
    /// JSON field names whose values differ (`x`, `keyframes`, ...).
    pub changed_keys: Vec<String>,
}

/// Compare two element lists by id and top-level JSON fields.
pub fn diff_elements(from: &[Element], to: &[Element]) -> VersionDiff {
    let find = |list: &[Element], id: &ElementId| list.iter().find(|e| &e.id == id).cloned();

    let mut diff = VersionDiff::default();
    for el in from {
        if find(to, &el.id).is_none() {
            diff.removed.push(el.id.clone());
        }
    }
    for el in to {
        match find(from, &el.id) {
            None => diff.added.push(el.id.clone()),
            Some(old) => {
                let changed_keys = changed_fields(&old, el);
                if !changed_keys.is_empty() {
                    diff.modified.push(ElementChange {
                        id: el.id.clone(),
                        changed_keys,
                    });
                }
            }
        }
    }
    diff
}

fn changed_fields(old: &Element, new: &Element) -> Vec<String> {
    let (Ok(Value::Object(a)), Ok(Value::Object(b))) =
        (serde_json::to_value(old), serde_json::to_value(new))
    else {
        return Vec::new();
    };
    let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    keys.into_iter()
        .filter(|k| a.get(*k) != b.get(*k))
        .cloned()
        .collect()
}
