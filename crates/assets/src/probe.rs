//! Media probing: detect the payload format from its leading bytes.

/// Magic bytes for Matroska/WebM files (EBML header element ID).
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// ISO BMFF box types a MOV/MP4 file may open with.
const ISO_BMFF_LEADING_BOXES: [&[u8; 4]; 6] = [b"ftyp", b"moov", b"mdat", b"wide", b"free", b"skip"];

/// Formats recognised from magic bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    /// MP4 / MOV (ISO base media file format).
    IsoBmff,
    /// Matroska / WebM (EBML).
    Matroska,
}

impl MediaFormat {
    pub fn is_video(self) -> bool {
        matches!(self, MediaFormat::IsoBmff | MediaFormat::Matroska)
    }

    pub fn name(self) -> &'static str {
        match self {
            MediaFormat::Png => "png",
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Gif => "gif",
            MediaFormat::Webp => "webp",
            MediaFormat::Bmp => "bmp",
            MediaFormat::IsoBmff => "mp4",
            MediaFormat::Matroska => "matroska",
        }
    }
}

/// Detect the format of `data` from its magic bytes.
///
/// Probes the content rather than trusting a file extension or MIME type,
/// which may be missing or wrong on dropped files.
pub fn detect_format(data: &[u8]) -> Option<MediaFormat> {
    if data.starts_with(&PNG_MAGIC) {
        return Some(MediaFormat::Png);
    }
    if data.starts_with(&JPEG_MAGIC) {
        return Some(MediaFormat::Jpeg);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(MediaFormat::Gif);
    }
    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some(MediaFormat::Webp);
    }
    if data.starts_with(b"BM") && data.len() >= 14 {
        return Some(MediaFormat::Bmp);
    }
    if data.starts_with(&EBML_MAGIC) {
        // MKV and WebM share the EBML header; the DocType is not needed here.
        return Some(MediaFormat::Matroska);
    }
    if data.len() >= 8 && ISO_BMFF_LEADING_BOXES.iter().any(|b| &data[4..8] == *b) {
        return Some(MediaFormat::IsoBmff);
    }
    None
}
