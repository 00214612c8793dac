//! The `Editor`: single owner of the element store and everything derived
//! from it.
//!
//! Every mutating entry point takes `&mut self` and leaves the store and the
//! history consistent before returning: a successful mutation records exactly
//! one history entry, a failed one changes nothing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use cs_assets::{AssetError, MediaInfo, MediaKind};
use cs_common::{
    epoch_millis, EditorConfig, Element, ElementId, ElementType, PropertyKey, PropertySet,
    PropertyValue, TimeCode,
};
use cs_project::{AutoSaveTimer, ProjectResult};
use cs_timeline_eval::TimelineLane;
use tracing::{debug, info, warn};

use crate::canvas::{CanvasEvent, CanvasRenderer};
use crate::error::{EditorError, EditorResult};
use crate::history::HistoryManager;
use crate::playback::PlaybackClock;
use crate::selection::Selection;
use crate::snapshot::StoreSnapshot;
use crate::state::ElementStore;
use crate::versions::{VersionDiff, VersionLog, VersionSnapshot};

/// How far `rewind` steps the playhead back (seconds).
pub const REWIND_STEP_SECS: f64 = 1.0;

/// Token for an image/video add whose asset is still being decoded.
///
/// Each token carries its own payload. Hand it back to
/// [`Editor::complete_media_add`] together with the decode result.
#[derive(Debug)]
pub struct PendingMedia {
    request: u64,
    kind: MediaKind,
    source: String,
}

impl PendingMedia {
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// The payload reference (data URL or path) to decode.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Editor core state and its operations.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    store: ElementStore,
    history: HistoryManager,
    selection: Selection,
    playback: PlaybackClock,
    versions: VersionLog,
    autosave: AutoSaveTimer,
    mounted: bool,
    last_sync_error: Option<String>,
    /// Media adds issued but not yet completed.
    pending: HashSet<u64>,
    next_request: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::new(),
            history: HistoryManager::new(config.max_history_entries),
            selection: Selection::new(),
            playback: PlaybackClock::from_config(&config),
            versions: VersionLog::new(config.max_auto_versions),
            autosave: AutoSaveTimer::new(config.autosave_interval_ms),
            mounted: false,
            last_sync_error: None,
            pending: HashSet::new(),
            next_request: 0,
            config,
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn elements(&self) -> &[Element] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.store.find(id)
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.selection.selected()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.selected().and_then(|id| self.store.find(id))
    }

    pub fn playback(&self) -> &PlaybackClock {
        &self.playback
    }

    pub fn current_time(&self) -> TimeCode {
        self.playback.current_time()
    }

    pub fn versions(&self) -> &VersionLog {
        &self.versions
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Message of the last rejected JSON edit; cleared by the next good one.
    pub fn last_sync_error(&self) -> Option<&str> {
        self.last_sync_error.as_deref()
    }

    pub fn pending_media_count(&self) -> usize {
        self.pending.len()
    }

    // ---- Element store ----

    /// Add a text or shape element with the construction defaults, patched
    /// by `initial`. Image and video go through [`Self::begin_media_add`].
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        initial: Option<&PropertySet>,
    ) -> EditorResult<Element> {
        if element_type.is_media() {
            return Err(EditorError::UnsupportedAdd(element_type));
        }
        let mut element = Element::new(element_type);
        if let Some(props) = initial {
            element.apply(props)?;
        }
        Ok(self.append(element, &format!("Add {element_type}")))
    }

    /// Issue a token for an image/video add. Decode `pending.source()` and
    /// pass the result to [`Self::complete_media_add`].
    pub fn begin_media_add(&mut self, kind: MediaKind, source: impl Into<String>) -> PendingMedia {
        let request = self.next_request;
        self.next_request += 1;
        self.pending.insert(request);
        debug!(request, ?kind, "Media add started");
        PendingMedia {
            request,
            kind,
            source: source.into(),
        }
    }

    /// Finish a media add. The element is sized to the configured target
    /// width with the asset's aspect ratio.
    ///
    /// Returns `Ok(None)` if the request was abandoned (the editor was
    /// unmounted meanwhile). A failed decode adds nothing and records nothing.
    pub fn complete_media_add(
        &mut self,
        pending: PendingMedia,
        decoded: Result<MediaInfo, AssetError>,
    ) -> EditorResult<Option<Element>> {
        if !self.pending.remove(&pending.request) {
            warn!(request = pending.request, "Dropping result of abandoned media add");
            return Ok(None);
        }
        let info = decoded.inspect_err(|err| {
            warn!(request = pending.request, error = %err, "Media decode failed");
        })?;

        let element_type = match pending.kind {
            MediaKind::Image => ElementType::Image,
            MediaKind::Video => ElementType::Video,
        };
        let (width, height) = info.fitted_size(self.config.media_target_width);
        let element = Element::media(element_type, pending.source, width, height);
        Ok(Some(self.append(element, &format!("Add {element_type}"))))
    }

    /// Begin, decode and complete a media add in one call.
    pub fn add_media(
        &mut self,
        kind: MediaKind,
        source: impl Into<String>,
    ) -> EditorResult<Option<Element>> {
        let pending = self.begin_media_add(kind, source);
        let decoded = cs_assets::decode_source(kind, pending.source());
        self.complete_media_add(pending, decoded)
    }

    /// Validate and merge `props` into the element. An unknown id changes
    /// nothing but still records an entry.
    pub fn update_element(&mut self, id: &ElementId, props: &PropertySet) -> EditorResult<()> {
        match self.store.find_mut(id) {
            Some(element) => element.apply(props)?,
            None => debug!(element_id = %id, "Update of unknown element"),
        }
        self.record("Update element");
        Ok(())
    }

    /// Set one property, as the properties panel does on change.
    pub fn set_property(
        &mut self,
        id: &ElementId,
        key: PropertyKey,
        value: impl Into<PropertyValue>,
    ) -> EditorResult<()> {
        self.update_element(id, &PropertySet::new().with(key, value))
    }

    /// Set one property from raw input text. Numeric keys must parse.
    pub fn set_property_from_str(&mut self, id: &ElementId, key: &str, raw: &str) -> EditorResult<()> {
        let (key, value) = PropertySet::parse_entry(key, raw)?;
        self.set_property(id, key, value)
    }

    /// Append a copy of the element with a new id. `None` for an unknown id.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<Element> {
        let Some(copy) = self.store.find(id).map(Element::duplicate) else {
            debug!(element_id = %id, "Duplicate of unknown element");
            return None;
        };
        Some(self.append(copy, "Duplicate element"))
    }

    /// Remove the element and drop it from the selection. An unknown id
    /// still records an entry.
    pub fn delete_element(&mut self, id: &ElementId) {
        if self.store.remove(id).is_none() {
            debug!(element_id = %id, "Delete of unknown element");
        }
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        self.record("Delete element");
    }

    /// Merge `props` into the element's keyframe at `time`, creating it if
    /// needed. Properties already set at that time are kept.
    pub fn update_element_keyframe(
        &mut self,
        id: &ElementId,
        time: f64,
        props: &PropertySet,
    ) -> EditorResult<()> {
        match self.store.find_mut(id) {
            Some(element) => {
                props.validate_for(element.element_type())?;
                element.keyframes.upsert(time, props)?;
            }
            None => debug!(element_id = %id, time, "Keyframe update on unknown element"),
        }
        self.record("Update keyframe");
        Ok(())
    }

    /// Drop the keyframe at `time`. Returns `false` (and records nothing)
    /// if there was none.
    pub fn remove_element_keyframe(&mut self, id: &ElementId, time: f64) -> bool {
        let removed = self
            .store
            .find_mut(id)
            .and_then(|element| element.keyframes.remove(time))
            .is_some();
        if removed {
            self.record("Remove keyframe");
        }
        removed
    }

    // ---- Selection ----

    /// Select an element. Unknown ids are ignored.
    pub fn select(&mut self, id: &ElementId) -> bool {
        if !self.store.contains(id) {
            debug!(element_id = %id, "Ignoring selection of unknown element");
            return false;
        }
        self.selection.select(id.clone());
        true
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    // ---- History ----

    /// Step back one entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        snapshot.restore(&mut self.store);
        self.selection.retain_existing(&self.store);
        true
    }

    /// Step forward one entry. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        snapshot.restore(&mut self.store);
        self.selection.retain_existing(&self.store);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- JSON sync ----

    /// Pretty JSON of the current store.
    pub fn json_mirror(&self) -> EditorResult<String> {
        Ok(cs_project::to_json_string(self.store.as_slice())?)
    }

    /// Replace the store with the elements parsed from `text`. On error
    /// nothing changes and the message is kept in `last_sync_error`.
    pub fn apply_json(&mut self, text: &str) -> EditorResult<()> {
        let parsed = cs_project::from_json_string(text);
        self.apply_parsed(parsed, "Edit JSON")
    }

    /// Load a template file, replacing the store like [`Self::apply_json`].
    pub fn load_template_file(&mut self, path: &Path) -> EditorResult<()> {
        let parsed = cs_project::load_template(path);
        self.apply_parsed(parsed, "Import template")
    }

    pub fn save_template_file(&self, path: &Path) -> EditorResult<()> {
        Ok(cs_project::save_template(self.store.as_slice(), path)?)
    }

    /// Write `template.json` into `dir` and return its path.
    pub fn export_template(&self, dir: &Path) -> EditorResult<PathBuf> {
        Ok(cs_project::export_template(self.store.as_slice(), dir)?)
    }

    fn apply_parsed(&mut self, parsed: ProjectResult<Vec<Element>>, label: &str) -> EditorResult<()> {
        match parsed {
            Ok(elements) => {
                self.last_sync_error = None;
                self.replace_store(elements, label);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Rejected template");
                self.last_sync_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    // ---- Versions ----

    /// Snapshot the store into the version log. Returns the new version id,
    /// or `None` if nothing changed since the latest version.
    pub fn save_version(&mut self, is_auto_save: bool) -> Option<u64> {
        let now_ms = epoch_millis(SystemTime::now());
        self.versions
            .save(self.store.as_slice(), is_auto_save, now_ms)
    }

    /// Restore a version into the store and clear the selection.
    pub fn load_version(&mut self, id: u64) -> bool {
        let Some(version) = self.versions.get(id) else {
            debug!(version_id = id, "Load of unknown version");
            return false;
        };
        let elements = version.elements.clone();
        let label = format!("Restore {}", version.name);
        info!(version_id = id, elements = elements.len(), "Restoring version");
        self.replace_store(elements, &label);
        self.selection.clear();
        true
    }

    pub fn version(&self, id: u64) -> Option<&VersionSnapshot> {
        self.versions.get(id)
    }

    pub fn delete_version(&mut self, id: u64) -> bool {
        self.versions.delete(id)
    }

    pub fn rename_version(&mut self, id: u64, name: &str) -> bool {
        self.versions.rename(id, name)
    }

    pub fn update_version_description(&mut self, id: u64, description: &str) -> bool {
        self.versions.set_description(id, description)
    }

    pub fn compare_versions(&self, from: u64, to: u64) -> Option<VersionDiff> {
        self.versions.compare(from, to)
    }

    // ---- Lifecycle ----

    /// Attach the editor to its host. Starts the auto-save timer.
    pub fn mount(&mut self, now: Instant) {
        self.mounted = true;
        self.autosave.start(now);
        debug!("Editor mounted");
    }

    /// Detach from the host: stops auto-save and playback and abandons
    /// in-flight media adds.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.autosave.cancel();
        self.playback.pause();
        if !self.pending.is_empty() {
            warn!(abandoned = self.pending.len(), "Abandoning pending media adds");
            self.pending.clear();
        }
        debug!("Editor unmounted");
    }

    /// Take an auto-save snapshot if one is due at `now`. Returns the id of
    /// a newly stored version.
    pub fn poll_autosave(&mut self, now: Instant) -> Option<u64> {
        if !self.mounted || !self.autosave.poll(now) {
            return None;
        }
        self.save_version(true)
    }

    // ---- Playback ----

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_playback(&mut self) {
        self.playback.toggle();
    }

    pub fn seek(&mut self, secs: f64) {
        self.playback.seek(secs);
    }

    /// Step back [`REWIND_STEP_SECS`], clamped at zero.
    pub fn rewind(&mut self) {
        self.playback.rewind(REWIND_STEP_SECS);
    }

    pub fn return_to_start(&mut self) {
        self.playback.return_to_start();
    }

    /// Advance playback by one frame. Only runs while mounted.
    pub fn on_animation_frame(&mut self) -> bool {
        self.mounted && self.playback.advance_frame()
    }

    // ---- View ----

    /// Elements interpolated at the playhead, in paint order.
    pub fn evaluated_elements(&self) -> Vec<Element> {
        cs_timeline_eval::evaluate(self.store.as_slice(), self.playback.current_time())
    }

    /// Hand the current frame to `renderer`.
    pub fn render_to<R: CanvasRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.evaluated_elements(), self.selection.selected());
    }

    pub fn timeline_lanes(&self) -> Vec<TimelineLane> {
        cs_timeline_eval::timeline_lanes(self.store.as_slice())
    }

    /// Route a canvas interaction to selection or an element update.
    /// Transforms below the minimum box size are ignored.
    pub fn handle_canvas_event(&mut self, event: CanvasEvent) -> EditorResult<()> {
        match event {
            CanvasEvent::Select(id) => {
                self.select(&id);
            }
            CanvasEvent::Deselect => self.deselect(),
            CanvasEvent::DragEnd { id, x, y } => {
                let props = PropertySet::new()
                    .with(PropertyKey::X, x)
                    .with(PropertyKey::Y, y);
                self.update_element(&id, &props)?;
            }
            CanvasEvent::TransformEnd {
                id,
                x,
                y,
                width,
                height,
                rotation,
            } => {
                let min = self.config.min_transform_size;
                if width < min || height < min {
                    debug!(element_id = %id, width, height, "Transform below minimum size ignored");
                    return Ok(());
                }
                let props = PropertySet::new()
                    .with(PropertyKey::X, x)
                    .with(PropertyKey::Y, y)
                    .with(PropertyKey::Width, width)
                    .with(PropertyKey::Height, height)
                    .with(PropertyKey::Rotation, rotation);
                self.update_element(&id, &props)?;
            }
        }
        Ok(())
    }

    // ---- Internals ----

    fn record(&mut self, label: &str) {
        self.history
            .record(label, StoreSnapshot::capture(&self.store));
    }

    fn append(&mut self, mut element: Element, label: &str) -> Element {
        while self.store.contains(&element.id) {
            element.id = ElementId::generate();
        }
        let added = element.clone();
        if self.store.push(element).is_ok() {
            self.record(label);
        }
        added
    }

    fn replace_store(&mut self, elements: Vec<Element>, label: &str) {
        self.store.replace_all(elements);
        self.record(label);
        self.selection.retain_existing(&self.store);
    }
}
