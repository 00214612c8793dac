//! Error types for the project crate (thiserror-based).

use thiserror::Error;

/// Errors that can occur while reading or writing templates.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// File I/O error (read, write, path resolution).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The text is not JSON at all.
    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    /// The text is JSON but not a valid element list.
    #[error("Invalid template{}: {reason}", .index.map(|i| format!(" (element {i})")).unwrap_or_default())]
    InvalidTemplate {
        /// Position of the offending element, if one is to blame.
        index: Option<usize>,
        reason: String,
    },

    /// The template file path does not exist.
    #[error("Template file not found: {path}")]
    NotFound { path: String },
}

impl ProjectError {
    pub(crate) fn template(index: usize, reason: impl Into<String>) -> Self {
        ProjectError::InvalidTemplate {
            index: Some(index),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;
