//! Template deserialization: parsing and validating element lists.

use std::collections::HashSet;
use std::path::Path;

use cs_common::{Element, ElementType};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ProjectError, ProjectResult};

/// Parse a template: a JSON array of elements.
///
/// Missing geometry, timing and payload fields take the construction
/// defaults. Unknown fields are dropped. The whole text is rejected if any
/// element is malformed.
pub fn from_json_string(json: &str) -> ProjectResult<Vec<Element>> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        warn!(line = e.line(), column = e.column(), "Template text is not JSON");
        ProjectError::InvalidJson {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    })?;

    let Value::Array(entries) = value else {
        return Err(ProjectError::InvalidTemplate {
            index: None,
            reason: format!("expected a JSON array of elements, found {}", kind_of(&value)),
        });
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut elements = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let element = parse_element(index, entry)?;
        if !seen.insert(element.id.clone()) {
            return Err(ProjectError::template(
                index,
                format!("duplicate element id '{}'", element.id),
            ));
        }
        elements.push(element);
    }

    debug!(elements = elements.len(), "Deserialized template from JSON");
    Ok(elements)
}

/// Load a template file from `path`.
pub fn load_template(path: &Path) -> ProjectResult<Vec<Element>> {
    if !path.exists() {
        return Err(ProjectError::NotFound {
            path: path.display().to_string(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read template file");
        ProjectError::Io(e)
    })?;

    let elements = from_json_string(&json)?;

    info!(
        path = %path.display(),
        elements = elements.len(),
        "Template loaded"
    );
    Ok(elements)
}

fn parse_element(index: usize, entry: Value) -> ProjectResult<Element> {
    let Some(fields) = entry.as_object() else {
        return Err(ProjectError::template(
            index,
            format!("expected an object, found {}", kind_of(&entry)),
        ));
    };

    match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(Value::String(_)) => return Err(ProjectError::template(index, "empty 'id'")),
        Some(other) => {
            return Err(ProjectError::template(
                index,
                format!("'id' must be a string, found {}", kind_of(other)),
            ))
        }
        None => return Err(ProjectError::template(index, "missing 'id'")),
    }

    let element_type: ElementType = match fields.get("type") {
        Some(Value::String(t)) => t
            .parse()
            .map_err(|_| ProjectError::template(index, format!("unknown element type '{t}'")))?,
        Some(other) => {
            return Err(ProjectError::template(
                index,
                format!("'type' must be a string, found {}", kind_of(other)),
            ))
        }
        None => return Err(ProjectError::template(index, "missing 'type'")),
    };

    let element: Element =
        serde_json::from_value(entry).map_err(|e| ProjectError::template(index, e.to_string()))?;

    element
        .keyframes
        .validate_for(element_type)
        .map_err(|e| ProjectError::template(index, e.to_string()))?;

    Ok(element)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
