//! Element model errors (thiserror-based).

use thiserror::Error;

use crate::element::ElementType;
use crate::property::PropertyKey;

/// Errors raised while validating property sets against an element.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Property '{key}' does not apply to {element_type} elements")]
    NotApplicable {
        key: PropertyKey,
        element_type: ElementType,
    },

    #[error("Property '{key}' expects a {expected} value")]
    WrongKind {
        key: PropertyKey,
        expected: &'static str,
    },

    #[error("Property '{key}' must be an integer, got {value}")]
    NotIntegral { key: PropertyKey, value: f64 },

    #[error("Unknown property: {0}")]
    UnknownKey(String),

    #[error("Invalid keyframe time: {0}")]
    InvalidTime(String),

    #[error("Property '{key}' expects a number, got '{raw}'")]
    ParseNumber { key: PropertyKey, raw: String },
}

/// Convenience Result type for element model operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors raised while loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
