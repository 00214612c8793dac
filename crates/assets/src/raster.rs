//! Raster image headers via the `image` crate.

use std::io::Cursor;

use image::ImageReader;

use crate::error::AssetResult;

/// Pixel size of an encoded raster image. Only the header is read.
pub fn image_dimensions(data: &[u8]) -> AssetResult<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader.format();
    let dims = reader.into_dimensions()?;
    tracing::debug!(?format, width = dims.0, height = dims.1, "Read image header");
    Ok(dims)
}
