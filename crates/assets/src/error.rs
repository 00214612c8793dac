//! Error types for asset decoding.

use thiserror::Error;

/// Errors raised while decoding an image or video payload.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unsupported media format{}", .0.as_deref().map(|f| format!(": {f}")).unwrap_or_default())]
    UnsupportedFormat(Option<String>),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Truncated data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Invalid container structure at offset {offset}: {reason}")]
    InvalidStructure { offset: u64, reason: String },

    #[error("No video track found")]
    NoVideoTrack,

    #[error("Media has zero width or height")]
    ZeroDimensions,
}

/// Convenience Result type for asset decoding.
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_message() {
        assert_eq!(
            AssetError::UnsupportedFormat(None).to_string(),
            "Unsupported media format"
        );
        assert_eq!(
            AssetError::UnsupportedFormat(Some("matroska".into())).to_string(),
            "Unsupported media format: matroska"
        );
    }
}
