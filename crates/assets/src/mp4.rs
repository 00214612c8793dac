//! Minimal ISO BMFF (MP4/MOV) reader: just enough box walking to find the
//! display size of the first video track.
//!
//! Path: `moov` -> `trak` -> `tkhd` (width/height, 16.16 fixed point), with
//! `trak` -> `mdia` -> `hdlr` telling video tracks from audio ones.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, trace};

use crate::error::{AssetError, AssetResult};

const fn fourcc(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | (d as u32)
}

pub const MOOV: u32 = fourcc(b'm', b'o', b'o', b'v');
pub const TRAK: u32 = fourcc(b't', b'r', b'a', b'k');
pub const TKHD: u32 = fourcc(b't', b'k', b'h', b'd');
pub const MDIA: u32 = fourcc(b'm', b'd', b'i', b'a');
pub const HDLR: u32 = fourcc(b'h', b'd', b'l', b'r');
pub const VIDE: u32 = fourcc(b'v', b'i', b'd', b'e');

/// Convert a FourCC code to a printable string.
pub fn fourcc_to_string(cc: u32) -> String {
    cc.to_be_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect()
}

/// A parsed box header.
#[derive(Clone, Debug)]
pub struct BoxHeader {
    pub box_type: u32,
    /// Offset of the box start.
    pub offset: u64,
    /// Offset of the first byte after the box (resolved for size-0 boxes).
    pub end: u64,
    /// 8 or 16 bytes.
    pub header_size: u8,
}

impl BoxHeader {
    pub fn content_offset(&self) -> u64 {
        self.offset + u64::from(self.header_size)
    }
}

/// Read a box header at the current position, bounded by `limit`.
/// Returns `None` when fewer than 8 bytes remain before `limit`.
pub fn read_box_header<R: Read + Seek>(reader: &mut R, limit: u64) -> AssetResult<Option<BoxHeader>> {
    let offset = reader.stream_position()?;
    if offset + 8 > limit {
        return Ok(None);
    }

    let size32 = reader.read_u32::<BigEndian>()?;
    let box_type = reader.read_u32::<BigEndian>()?;

    let (size, header_size) = match size32 {
        // Box extends to the end of its parent.
        0 => (limit - offset, 8u8),
        1 => {
            let size64 = reader.read_u64::<BigEndian>()?;
            (size64, 16u8)
        }
        _ => (u64::from(size32), 8u8),
    };

    if size < u64::from(header_size) {
        return Err(AssetError::InvalidStructure {
            offset,
            reason: format!(
                "Box '{}' has invalid size {} (less than header)",
                fourcc_to_string(box_type),
                size
            ),
        });
    }
    let end = offset.saturating_add(size);
    if end > limit {
        return Err(AssetError::InvalidStructure {
            offset,
            reason: format!(
                "Box '{}' of size {} overruns its parent (ends at {})",
                fourcc_to_string(box_type),
                size,
                limit
            ),
        });
    }

    trace!("Box '{}' at offset {}, size {}", fourcc_to_string(box_type), offset, size);

    Ok(Some(BoxHeader {
        box_type,
        offset,
        end,
        header_size,
    }))
}

/// Headers of the boxes laid out back to back in `[start, end)`.
fn child_boxes<R: Read + Seek>(reader: &mut R, start: u64, end: u64) -> AssetResult<Vec<BoxHeader>> {
    let mut children = Vec::new();
    reader.seek(SeekFrom::Start(start))?;
    while let Some(header) = read_box_header(reader, end)? {
        reader.seek(SeekFrom::Start(header.end))?;
        children.push(header);
    }
    Ok(children)
}

/// Parsed tkhd (Track Header) box.
#[derive(Clone, Debug, PartialEq)]
pub struct TkhdBox {
    pub track_id: u32,
    pub width: u32,
    pub height: u32,
}

/// Parse a tkhd payload at the current position.
pub fn parse_tkhd<R: Read>(reader: &mut R) -> AssetResult<TkhdBox> {
    let version = reader.read_u8()?;
    let mut flags = [0u8; 3];
    reader.read_exact(&mut flags)?;

    let track_id = if version == 1 {
        let _creation_time = reader.read_u64::<BigEndian>()?;
        let _modification_time = reader.read_u64::<BigEndian>()?;
        let track_id = reader.read_u32::<BigEndian>()?;
        let _reserved = reader.read_u32::<BigEndian>()?;
        let _duration = reader.read_u64::<BigEndian>()?;
        track_id
    } else {
        let _creation_time = reader.read_u32::<BigEndian>()?;
        let _modification_time = reader.read_u32::<BigEndian>()?;
        let track_id = reader.read_u32::<BigEndian>()?;
        let _reserved = reader.read_u32::<BigEndian>()?;
        let _duration = reader.read_u32::<BigEndian>()?;
        track_id
    };

    // reserved (8), layer (2), alt_group (2), volume (2), reserved (2), matrix (36)
    let mut skip_buf = [0u8; 52];
    reader.read_exact(&mut skip_buf)?;

    // 16.16 fixed point
    let width = reader.read_u32::<BigEndian>()? >> 16;
    let height = reader.read_u32::<BigEndian>()? >> 16;

    debug!("tkhd: track_id={}, {}x{}", track_id, width, height);

    Ok(TkhdBox {
        track_id,
        width,
        height,
    })
}

/// Bytes `parse_tkhd` reads for a payload of this version.
fn tkhd_payload_len(version: u8) -> usize {
    if version == 1 {
        96
    } else {
        84
    }
}

/// version/flags, pre_defined, handler_type.
const HDLR_MIN_LEN: usize = 12;

fn box_content<'a>(data: &'a [u8], header: &BoxHeader) -> &'a [u8] {
    let start = header.content_offset() as usize;
    let end = header.end as usize;
    data.get(start..end).unwrap_or(&[])
}

fn ensure_len(content: &[u8], expected: usize) -> AssetResult<()> {
    if content.len() < expected {
        return Err(AssetError::Truncated {
            expected,
            actual: content.len(),
        });
    }
    Ok(())
}

/// Handler type of a `hdlr` payload (`vide`, `soun`, ...).
fn parse_hdlr_type<R: Read>(reader: &mut R) -> AssetResult<u32> {
    let _version_flags = reader.read_u32::<BigEndian>()?;
    let _pre_defined = reader.read_u32::<BigEndian>()?;
    Ok(reader.read_u32::<BigEndian>()?)
}

/// Display size of a `trak`, if it is a video track with non-zero size.
fn video_track_size(cursor: &mut Cursor<&[u8]>, trak: &BoxHeader) -> AssetResult<Option<TkhdBox>> {
    let data: &[u8] = *cursor.get_ref();
    let mut tkhd = None;
    let mut handler = None;

    for child in child_boxes(cursor, trak.content_offset(), trak.end)? {
        match child.box_type {
            TKHD => {
                let content = box_content(data, &child);
                let version = content.first().copied().unwrap_or(0);
                ensure_len(content, tkhd_payload_len(version))?;
                tkhd = Some(parse_tkhd(&mut Cursor::new(content))?);
            }
            MDIA => {
                let mdia_children = child_boxes(cursor, child.content_offset(), child.end)?;
                if let Some(hdlr) = mdia_children.iter().find(|b| b.box_type == HDLR) {
                    let content = box_content(data, hdlr);
                    ensure_len(content, HDLR_MIN_LEN)?;
                    handler = Some(parse_hdlr_type(&mut Cursor::new(content))?);
                }
            }
            _ => {}
        }
    }

    let is_video = handler.map_or(true, |h| h == VIDE);
    Ok(tkhd.filter(|t| is_video && t.width > 0 && t.height > 0))
}

/// Find the display size of the first video track of an MP4/MOV file.
pub fn video_dimensions(data: &[u8]) -> AssetResult<(u32, u32)> {
    let mut cursor = Cursor::new(data);
    let len = data.len() as u64;

    let moov = child_boxes(&mut cursor, 0, len)?
        .into_iter()
        .find(|b| b.box_type == MOOV)
        .ok_or(AssetError::NoVideoTrack)?;

    for trak in child_boxes(&mut cursor, moov.content_offset(), moov.end)?
        .into_iter()
        .filter(|b| b.box_type == TRAK)
    {
        if let Some(tkhd) = video_track_size(&mut cursor, &trak)? {
            return Ok((tkhd.width, tkhd.height));
        }
    }

    Err(AssetError::NoVideoTrack)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a box from fourcc + payload.
    pub(crate) fn make_box(fourcc: u32, payload: &[u8]) -> Vec<u8> {
        let size = (payload.len() + 8) as u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(&size.to_be_bytes());
        buf.extend_from_slice(&fourcc.to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    /// Version-0 tkhd payload with the given display size.
    pub(crate) fn tkhd_payload(track_id: u32, width: u32, height: u32) -> Vec<u8> {
        let mut p = vec![0u8; 4]; // version 0, flags
        p.extend_from_slice(&0u32.to_be_bytes()); // creation
        p.extend_from_slice(&0u32.to_be_bytes()); // modification
        p.extend_from_slice(&track_id.to_be_bytes());
        p.extend_from_slice(&0u32.to_be_bytes()); // reserved
        p.extend_from_slice(&1000u32.to_be_bytes()); // duration
        p.extend_from_slice(&[0u8; 52]);
        p.extend_from_slice(&(width << 16).to_be_bytes());
        p.extend_from_slice(&(height << 16).to_be_bytes());
        p
    }

    fn hdlr_box(handler: &[u8; 4]) -> Vec<u8> {
        let mut p = vec![0u8; 8];
        p.extend_from_slice(handler);
        p.extend_from_slice(&[0u8; 12]);
        make_box(HDLR, &p)
    }

    fn trak(handler: &[u8; 4], track_id: u32, w: u32, h: u32) -> Vec<u8> {
        let mut payload = make_box(TKHD, &tkhd_payload(track_id, w, h));
        payload.extend(make_box(MDIA, &hdlr_box(handler)));
        make_box(TRAK, &payload)
    }

    /// A minimal MP4 with the given tracks under moov.
    pub(crate) fn mp4_with(tracks: &[Vec<u8>]) -> Vec<u8> {
        let mut file = make_box(fourcc(b'f', b't', b'y', b'p'), b"isom\0\0\0\0");
        file.extend(make_box(MOOV, &tracks.concat()));
        file
    }

    pub(crate) fn video_trak(w: u32, h: u32) -> Vec<u8> {
        trak(b"vide", 1, w, h)
    }

    #[test]
    fn fourcc_roundtrip() {
        assert_eq!(fourcc_to_string(MOOV), "moov");
        assert_eq!(fourcc_to_string(TKHD), "tkhd");
    }

    #[test]
    fn parse_tkhd_v0() {
        let payload = tkhd_payload(7, 1920, 1080);
        let tkhd = parse_tkhd(&mut Cursor::new(&payload)).unwrap();
        assert_eq!(tkhd, TkhdBox { track_id: 7, width: 1920, height: 1080 });
    }

    #[test]
    fn finds_video_track_after_audio() {
        let data = mp4_with(&[trak(b"soun", 1, 0, 0), trak(b"vide", 2, 640, 360)]);
        assert_eq!(video_dimensions(&data).unwrap(), (640, 360));
    }

    #[test]
    fn skips_sized_non_video_track() {
        let data = mp4_with(&[trak(b"subt", 1, 320, 40), video_trak(1280, 720)]);
        assert_eq!(video_dimensions(&data).unwrap(), (1280, 720));
    }

    #[test]
    fn no_moov_is_no_video_track() {
        let data = make_box(fourcc(b'f', b't', b'y', b'p'), b"isom\0\0\0\0");
        assert!(matches!(video_dimensions(&data), Err(AssetError::NoVideoTrack)));
    }

    #[test]
    fn audio_only_is_no_video_track() {
        let data = mp4_with(&[trak(b"soun", 1, 0, 0)]);
        assert!(matches!(video_dimensions(&data), Err(AssetError::NoVideoTrack)));
    }

    #[test]
    fn overrunning_box_is_invalid() {
        let mut data = mp4_with(&[video_trak(640, 360)]);
        data.truncate(data.len() - 4);
        assert!(matches!(
            video_dimensions(&data),
            Err(AssetError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn short_tkhd_is_truncated() {
        let mut payload = tkhd_payload(1, 640, 360);
        payload.truncate(40);
        let data = mp4_with(&[make_box(TRAK, &make_box(TKHD, &payload))]);
        assert!(matches!(
            video_dimensions(&data),
            Err(AssetError::Truncated {
                expected: 84,
                actual: 40
            })
        ));
    }

    #[test]
    fn tkhd_payload_is_full_length() {
        assert_eq!(tkhd_payload(1, 2, 2).len(), tkhd_payload_len(0));
    }

    #[test]
    fn header_smaller_than_minimum_is_invalid() {
        let mut data = Vec::new();
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(&MOOV.to_be_bytes());
        assert!(matches!(
            read_box_header(&mut Cursor::new(&data), data.len() as u64),
            Err(AssetError::InvalidStructure { .. })
        ));
    }
}
