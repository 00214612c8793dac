//! Template serialization: writing element lists to JSON.

use std::path::{Path, PathBuf};

use cs_common::Element;
use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};

/// File name used when exporting a template into a directory.
pub const TEMPLATE_FILE_NAME: &str = "template.json";

/// Serialize elements to a pretty-printed JSON array.
pub fn to_json_string(elements: &[Element]) -> ProjectResult<String> {
    let json = serde_json::to_string_pretty(elements)?;
    debug!(
        elements = elements.len(),
        json_len = json.len(),
        "Serialized template to JSON"
    );
    Ok(json)
}

/// Serialize elements to a compact (non-pretty) JSON array.
pub fn to_json_string_compact(elements: &[Element]) -> ProjectResult<String> {
    Ok(serde_json::to_string(elements)?)
}

/// Save elements to a template file at `path`.
///
/// The data is first written to a temporary file next to the target and then
/// renamed over it, so an interrupted write never leaves a truncated template.
pub fn save_template(elements: &[Element], path: &Path) -> ProjectResult<()> {
    let json = to_json_string(elements)?;
    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %temp_path.display(), error = %e, "Failed to write temp file");
        ProjectError::Io(e)
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        tracing::error!(
            from = %temp_path.display(),
            to = %path.display(),
            error = %e,
            "Failed to rename temp file to target"
        );
        ProjectError::Io(e)
    })?;

    info!(
        elements = elements.len(),
        path = %path.display(),
        "Template saved"
    );
    Ok(())
}

/// Export elements as `template.json` inside `dir`, returning the file path.
pub fn export_template(elements: &[Element], dir: &Path) -> ProjectResult<PathBuf> {
    let path = dir.join(TEMPLATE_FILE_NAME);
    save_template(elements, &path)?;
    Ok(path)
}
