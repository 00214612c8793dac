//! `cs-assets` -- Asset header decoding for image and video adds.
//!
//! Adding an image or video element needs the media's natural size before the
//! element can be placed. This crate turns a payload reference (a `data:` URL
//! or a file path) into a [`MediaInfo`]:
//!
//! - **Probe**: format detection from magic bytes
//! - **Raster**: PNG/JPEG/GIF/WebP/BMP header via the `image` crate
//! - **MP4/MOV**: first video track's `tkhd` display size
//!
//! Decoding is synchronous and self-contained so callers can run it wherever
//! they like and hand the result back to the editor.

pub mod data_url;
pub mod error;
pub mod mp4;
pub mod probe;
pub mod raster;

use std::path::Path;

pub use data_url::{decode_data_url, is_data_url, DataUrl};
pub use error::{AssetError, AssetResult};
pub use probe::{detect_format, MediaFormat};

/// Which kind of media an add expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Natural size of a decoded image or video.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MediaInfo {
    pub format: Option<MediaFormat>,
    pub width: u32,
    pub height: u32,
}

impl MediaInfo {
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Size when scaled to `target_width`, keeping the aspect ratio.
    pub fn fitted_size(&self, target_width: f64) -> (f64, f64) {
        (target_width, target_width / self.aspect_ratio())
    }
}

/// Decode the header of `bytes` as media of `kind`.
pub fn decode_media(kind: MediaKind, bytes: &[u8]) -> AssetResult<MediaInfo> {
    let format = detect_format(bytes);
    let (width, height) = match (kind, format) {
        (MediaKind::Image, Some(f)) if f.is_video() => {
            return Err(AssetError::UnsupportedFormat(Some(f.name().to_string())))
        }
        (MediaKind::Image, _) => raster::image_dimensions(bytes)?,
        (MediaKind::Video, Some(MediaFormat::IsoBmff)) => mp4::video_dimensions(bytes)?,
        (MediaKind::Video, other) => {
            return Err(AssetError::UnsupportedFormat(other.map(|f| f.name().to_string())))
        }
    };
    if width == 0 || height == 0 {
        return Err(AssetError::ZeroDimensions);
    }
    tracing::debug!(?kind, ?format, width, height, "Decoded media header");
    Ok(MediaInfo {
        format,
        width,
        height,
    })
}

/// Load the raw bytes behind a payload reference: a `data:` URL or a path.
pub fn read_source(source: &str) -> AssetResult<Vec<u8>> {
    if is_data_url(source) {
        Ok(decode_data_url(source)?.bytes)
    } else {
        Ok(std::fs::read(Path::new(source))?)
    }
}

/// [`read_source`] followed by [`decode_media`].
pub fn decode_source(kind: MediaKind, source: &str) -> AssetResult<MediaInfo> {
    let bytes = read_source(source)?;
    decode_media(kind, &bytes)
}
