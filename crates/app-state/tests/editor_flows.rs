//! End-to-end editor flows: history, JSON sync, versions, media adds and
//! playback driven through the public `Editor` surface.

use std::time::{Duration, Instant};

use cs_app_state::{CanvasEvent, Editor, EditorError, RecordingRenderer};
use cs_assets::{AssetError, MediaFormat, MediaInfo, MediaKind};
use cs_common::{
    EditorConfig, Element, ElementId, ElementType, PropertyKey, PropertySet, PropertyValue,
    TimeCode,
};
use cs_timeline_eval::interpolate;

fn x_at(time: f64, x: f64) -> (f64, PropertySet) {
    (time, PropertySet::new().with(PropertyKey::X, x))
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("cs_app_state_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ---- History ----

#[test]
fn n_mutations_make_n_entries() {
    let mut editor = Editor::default();
    let a = editor.add_element(ElementType::Text, None).unwrap().id;
    let b = editor.add_element(ElementType::Shape, None).unwrap().id;
    editor
        .update_element(&a, &PropertySet::new().with(PropertyKey::X, 1.0))
        .unwrap();
    editor.delete_element(&b);
    editor.delete_element(&ElementId::new("missing"));

    assert_eq!(editor.history().len(), 5);
    assert_eq!(editor.history().index(), Some(4));
}

#[test]
fn undo_then_redo_restores_store() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    editor.set_property(&id, PropertyKey::X, 300.0).unwrap();
    editor.set_property(&id, PropertyKey::Fill, "red").unwrap();
    let before: Vec<Element> = editor.elements().to_vec();

    assert!(editor.undo());
    assert_ne!(editor.elements(), before.as_slice());
    assert!(editor.redo());
    assert_eq!(editor.elements(), before.as_slice());
}

#[test]
fn undo_stops_at_oldest_entry() {
    let mut editor = Editor::default();
    assert!(!editor.undo());
    editor.add_element(ElementType::Text, None).unwrap();
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert_eq!(editor.elements().len(), 1);
}

#[test]
fn edit_after_undo_discards_redo() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    editor.set_property(&id, PropertyKey::X, 1.0).unwrap();
    editor.set_property(&id, PropertyKey::X, 2.0).unwrap();
    editor.undo();
    editor.set_property(&id, PropertyKey::X, 9.0).unwrap();

    assert!(!editor.can_redo());
    assert_eq!(editor.history().len(), 3);
    assert!(editor.undo());
    assert_eq!(editor.element(&id).unwrap().x, 1.0);
}

#[test]
fn history_cap_from_config() {
    let config = EditorConfig {
        max_history_entries: Some(2),
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config);
    for _ in 0..4 {
        editor.add_element(ElementType::Shape, None).unwrap();
    }
    assert_eq!(editor.history().len(), 2);
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.elements().len(), 3);
}

// ---- Keyframes ----

#[test]
fn text_x_interpolates_to_midpoint() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    for (t, props) in [x_at(0.0, 0.0), x_at(4.0, 400.0)] {
        editor.update_element_keyframe(&id, t, &props).unwrap();
    }
    let el = editor.element(&id).unwrap();
    assert_eq!(interpolate(el, TimeCode::from_secs(2.0)).x, 200.0);
    assert_eq!(interpolate(el, TimeCode::from_secs(4.0)).x, 400.0);
}

#[test]
fn evaluated_view_follows_playhead() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Shape, None).unwrap().id;
    for (t, props) in [x_at(0.0, 0.0), x_at(2.0, 100.0)] {
        editor.update_element_keyframe(&id, t, &props).unwrap();
    }
    editor.seek(1.0);
    assert_eq!(editor.evaluated_elements()[0].x, 50.0);

    // The store keeps the authored value.
    assert_eq!(editor.element(&id).unwrap().x, 100.0);
}

#[test]
fn render_passes_paint_order_and_selection() {
    let mut editor = Editor::default();
    let bottom = editor.add_element(ElementType::Shape, None).unwrap().id;
    let top = editor.add_element(ElementType::Text, None).unwrap().id;
    editor.set_property(&bottom, PropertyKey::ZIndex, 5).unwrap();
    editor.select(&top);

    let mut renderer = RecordingRenderer::default();
    editor.render_to(&mut renderer);
    assert_eq!(renderer.frames, 1);
    let order: Vec<&ElementId> = renderer.last_elements.iter().map(|e| &e.id).collect();
    assert_eq!(order, [&top, &bottom]);
    assert_eq!(renderer.last_selected, Some(top));
}

#[test]
fn timeline_lanes_list_keyframes() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    editor
        .update_element_keyframe(&id, 2.5, &PropertySet::new().with(PropertyKey::Y, 0.0))
        .unwrap();
    let lanes = editor.timeline_lanes();
    assert_eq!(lanes.len(), 1);
    assert_eq!(lanes[0].track_label(), "Track 1");
    assert_eq!(lanes[0].keyframe_times, vec![2.5]);
}

// ---- JSON sync ----

fn store_with_all_types() -> Editor {
    let mut editor = Editor::default();
    let text = editor.add_element(ElementType::Text, None).unwrap().id;
    editor.add_element(ElementType::Shape, None).unwrap();
    for kind in [MediaKind::Image, MediaKind::Video] {
        let pending = editor.begin_media_add(kind, format!("asset-{kind:?}"));
        let info = MediaInfo {
            format: None,
            width: 400,
            height: 300,
        };
        editor.complete_media_add(pending, Ok(info)).unwrap();
    }
    for (t, props) in [x_at(0.0, 0.0), x_at(1.5, 80.0)] {
        editor.update_element_keyframe(&text, t, &props).unwrap();
    }
    editor
}

#[test]
fn json_round_trip_all_types() {
    let editor = store_with_all_types();
    let json = editor.json_mirror().unwrap();
    let parsed = cs_project::from_json_string(&json).unwrap();
    assert_eq!(parsed, editor.elements());

    let types: Vec<ElementType> = parsed.iter().map(Element::element_type).collect();
    assert_eq!(types, ElementType::ALL);
}

#[test]
fn apply_json_replaces_store() {
    let mut editor = store_with_all_types();
    let json = r#"[{"id":"t1","type":"text","text":"Hi","x":5}]"#;
    editor.apply_json(json).unwrap();

    assert_eq!(editor.elements().len(), 1);
    let el = &editor.elements()[0];
    assert_eq!(el.id, "t1");
    assert_eq!(el.x, 5.0);
    assert_eq!(el.y, 100.0);
    assert_eq!(el.get(PropertyKey::FontSize), Some(PropertyValue::Number(20.0)));
    assert!(editor.last_sync_error().is_none());

    assert!(editor.undo());
    assert_eq!(editor.elements().len(), 4);
}

#[test]
fn bad_json_leaves_state_untouched() {
    let mut editor = store_with_all_types();
    let id = editor.elements()[0].id.clone();
    editor.select(&id);
    let before = editor.elements().to_vec();
    let history_len = editor.history().len();

    for text in ["[{", r#"{"id":"a"}"#, r#"[{"type":"text"}]"#, r#"[{"id":"a","type":"sticker"}]"#] {
        assert!(matches!(editor.apply_json(text), Err(EditorError::Project(_))));
        assert!(editor.last_sync_error().is_some());
    }
    assert_eq!(editor.elements(), before.as_slice());
    assert_eq!(editor.history().len(), history_len);
    assert_eq!(editor.selected(), Some(&id));

    editor.apply_json("[]").unwrap();
    assert!(editor.last_sync_error().is_none());
    assert!(editor.selected().is_none());
}

#[test]
fn template_file_export_and_import() {
    let dir = temp_dir("template");
    let editor = store_with_all_types();
    let path = editor.export_template(&dir).unwrap();
    assert!(path.ends_with("template.json"));

    let mut other = Editor::default();
    other.load_template_file(&path).unwrap();
    assert_eq!(other.elements(), editor.elements());

    assert!(other.load_template_file(&dir.join("missing.json")).is_err());
    assert!(other.last_sync_error().is_some());
    assert_eq!(other.elements().len(), 4);
    let _ = std::fs::remove_dir_all(&dir);
}

// ---- Versions ----

#[test]
fn auto_save_twice_without_edits_stores_one() {
    let mut editor = Editor::default();
    editor.add_element(ElementType::Text, None).unwrap();
    assert!(editor.save_version(true).is_some());
    assert!(editor.save_version(true).is_none());
    assert_eq!(editor.versions().len(), 1);
}

#[test]
fn auto_save_eviction_keeps_max() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Shape, None).unwrap().id;
    let mut ids = Vec::new();
    for i in 0..12 {
        editor.set_property(&id, PropertyKey::X, f64::from(i)).unwrap();
        ids.push(editor.save_version(true).unwrap());
    }
    assert_eq!(editor.versions().len(), 10);
    let kept: Vec<u64> = editor.versions().iter().map(|v| v.id).collect();
    assert_eq!(kept, ids[2..].to_vec());
    assert!(kept.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn load_version_restores_and_clears_selection() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    let v1 = editor.save_version(false).unwrap();
    editor.set_property(&id, PropertyKey::X, 999.0).unwrap();
    editor.select(&id);
    let history_len = editor.history().len();

    assert!(editor.load_version(v1));
    assert_eq!(editor.element(&id).unwrap().x, 100.0);
    assert!(editor.selected().is_none());
    assert_eq!(editor.history().len(), history_len + 1);
    assert!(!editor.load_version(12345));
}

#[test]
fn version_metadata_and_compare() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Text, None).unwrap().id;
    let v1 = editor.save_version(false).unwrap();
    editor.set_property(&id, PropertyKey::Text, "Changed").unwrap();
    editor.add_element(ElementType::Shape, None).unwrap();
    let v2 = editor.save_version(false).unwrap();

    assert!(editor.rename_version(v1, "First draft"));
    assert!(editor.update_version_description(v1, "before copy edits"));
    assert_eq!(editor.version(v1).unwrap().name, "First draft");
    assert_eq!(editor.version(v2).unwrap().name, "Version 2");

    let diff = editor.compare_versions(v1, v2).unwrap();
    assert_eq!(diff.added.len(), 1);
    assert!(diff.removed.is_empty());
    assert_eq!(diff.modified[0].changed_keys, vec!["text".to_string()]);

    assert!(editor.delete_version(v1));
    assert!(editor.compare_versions(v1, v2).is_none());
}

#[test]
fn autosave_runs_only_while_mounted() {
    let mut editor = Editor::default();
    editor.add_element(ElementType::Text, None).unwrap();
    let start = Instant::now();
    assert!(editor.poll_autosave(start + Duration::from_secs(10)).is_none());

    editor.mount(start);
    assert!(editor.poll_autosave(start + Duration::from_millis(4999)).is_none());
    assert!(editor.poll_autosave(start + Duration::from_millis(5000)).is_some());
    assert!(editor.versions().latest().unwrap().is_auto_save);

    editor.unmount();
    editor.add_element(ElementType::Shape, None).unwrap();
    assert!(editor.poll_autosave(start + Duration::from_secs(60)).is_none());
    assert_eq!(editor.versions().len(), 1);
}

// ---- Media adds ----

#[test]
fn media_add_sizes_to_target_width() {
    let mut editor = Editor::default();
    let pending = editor.begin_media_add(MediaKind::Video, "clip.mp4");
    assert_eq!(pending.source(), "clip.mp4");
    let info = MediaInfo {
        format: Some(MediaFormat::IsoBmff),
        width: 1920,
        height: 1080,
    };
    let el = editor.complete_media_add(pending, Ok(info)).unwrap().unwrap();
    assert_eq!(el.element_type(), ElementType::Video);
    assert_eq!(el.width, 200.0);
    assert!((el.height - 112.5).abs() < 1e-9);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn failed_decode_adds_nothing() {
    let mut editor = Editor::default();
    let pending = editor.begin_media_add(MediaKind::Image, "broken.png");
    let result = editor.complete_media_add(pending, Err(AssetError::ZeroDimensions));
    assert!(matches!(result, Err(EditorError::AssetDecodeFailure(_))));
    assert!(editor.elements().is_empty());
    assert!(editor.history().is_empty());
    assert_eq!(editor.pending_media_count(), 0);
}

#[test]
fn edits_during_decode_are_kept() {
    let mut editor = Editor::default();
    let pending = editor.begin_media_add(MediaKind::Image, "logo.png");
    let text = editor.add_element(ElementType::Text, None).unwrap().id;
    editor.set_property(&text, PropertyKey::X, 42.0).unwrap();

    let info = MediaInfo {
        format: Some(MediaFormat::Png),
        width: 100,
        height: 50,
    };
    editor.complete_media_add(pending, Ok(info)).unwrap();
    assert_eq!(editor.elements().len(), 2);
    assert_eq!(editor.element(&text).unwrap().x, 42.0);
    assert_eq!(editor.elements()[1].height, 100.0);
}

#[test]
fn unmount_abandons_pending_media() {
    let mut editor = Editor::default();
    editor.mount(Instant::now());
    let pending = editor.begin_media_add(MediaKind::Image, "late.png");
    editor.unmount();

    let info = MediaInfo {
        format: None,
        width: 10,
        height: 10,
    };
    assert!(editor.complete_media_add(pending, Ok(info)).unwrap().is_none());
    assert!(editor.elements().is_empty());
    assert!(editor.history().is_empty());
}

#[test]
fn add_media_reports_unreadable_source() {
    let mut editor = Editor::default();
    let result = editor.add_media(MediaKind::Image, "data:image/png;base64,@@@");
    assert!(matches!(result, Err(EditorError::AssetDecodeFailure(_))));
    assert!(editor.elements().is_empty());
}

// ---- Canvas and playback ----

#[test]
fn tiny_transform_is_rejected() {
    let mut editor = Editor::default();
    let id = editor.add_element(ElementType::Shape, None).unwrap().id;
    let event = |width: f64| CanvasEvent::TransformEnd {
        id: id.clone(),
        x: 10.0,
        y: 10.0,
        width,
        height: 40.0,
        rotation: 45.0,
    };
    editor.handle_canvas_event(event(3.0)).unwrap();
    assert_eq!(editor.history().len(), 1);

    editor.handle_canvas_event(event(60.0)).unwrap();
    let el = editor.element(&id).unwrap();
    assert_eq!((el.width, el.height, el.rotation), (60.0, 40.0, 45.0));
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn playback_wraps_at_window() {
    let mut editor = Editor::default();
    editor.mount(Instant::now());
    editor.seek(9.995);
    editor.toggle_playback();
    assert!(editor.on_animation_frame());
    assert_eq!(editor.current_time(), TimeCode::ZERO);
    assert!(editor.playback().is_playing());

    editor.pause();
    assert!(!editor.on_animation_frame());
}
