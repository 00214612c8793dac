//! Error types for editor operations (thiserror-based).

use cs_assets::AssetError;
use cs_common::{ElementType, PropertyError};
use cs_project::ProjectError;
use thiserror::Error;

/// Errors an `Editor` entry point can return. A failed call leaves the
/// store, history and selection as they were.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Template text or file could not be parsed, read or written.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Image or video bytes could not be decoded.
    #[error("Asset decode failed: {0}")]
    AssetDecodeFailure(#[from] AssetError),

    /// A property patch does not fit the element.
    #[error("Invalid property: {0}")]
    InvalidProperty(#[from] PropertyError),

    /// Media elements need an asset and go through the media add path.
    #[error("Cannot add {0} element without an asset")]
    UnsupportedAdd(ElementType),
}

/// Convenience Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cs_common::PropertyKey;

    #[test]
    fn error_display_messages() {
        let err = EditorError::UnsupportedAdd(ElementType::Video);
        assert_eq!(err.to_string(), "Cannot add video element without an asset");

        let err: EditorError = PropertyError::WrongKind {
            key: PropertyKey::X,
            expected: "number",
        }
        .into();
        assert!(err.to_string().starts_with("Invalid property: "));

        let err: EditorError = AssetError::ZeroDimensions.into();
        assert!(matches!(err, EditorError::AssetDecodeFailure(_)));
    }
}
