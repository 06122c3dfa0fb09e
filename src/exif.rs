//! Minimal EXIF reader for JPEG photos.
//!
//! Extracts the five fields the photo captions use:
//! - Make (0x010F) and Model (0x0110) from IFD0
//! - FNumber (0x829D), ISO (0x8827), and DateTimeOriginal (0x9003) from the
//!   Exif sub-IFD (pointer tag 0x8769)
//!
//! EXIF is a TIFF block embedded in the JPEG APP1 segment behind an
//! `Exif\0\0` header. The parser scans JPEG markers for that segment, then
//! walks the TIFF IFDs honoring the declared byte order.
//!
//! Zero external dependencies — pure Rust, a couple hundred lines.
//!
//! A missing or unreadable *file* is an error; a readable JPEG with no EXIF
//! block (or with some tags absent) simply yields empty fields.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExifError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a JPEG file")]
    NotJpeg,
}

/// Camera metadata extracted from a photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifData {
    pub make: Option<String>,
    pub model: Option<String>,
    pub f_number: Option<f64>,
    pub iso: Option<u32>,
    /// DateTimeOriginal, as written by the camera (`YYYY:MM:DD HH:MM:SS`).
    pub taken: Option<String>,
}

impl ExifData {
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.f_number.is_none()
            && self.iso.is_none()
            && self.taken.is_none()
    }
}

/// Read EXIF metadata from a JPEG file.
pub fn read_exif(path: &Path) -> Result<ExifData, ExifError> {
    let bytes = std::fs::read(path)?;
    read_exif_from_bytes(&bytes)
}

pub fn read_exif_from_bytes(data: &[u8]) -> Result<ExifData, ExifError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ExifError::NotJpeg);
    }
    Ok(find_app1_exif(data).map(parse_tiff).unwrap_or_default())
}

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Find the TIFF block inside the JPEG's APP1 `Exif\0\0` segment.
fn find_app1_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // SOS (0xDA) means image data starts — stop scanning
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        // Markers without a length field
        if (0xD0..=0xD8).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }
        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());
        if marker == 0xE1 {
            let segment = &data[seg_start..seg_end.max(seg_start)];
            if segment.starts_with(EXIF_HEADER) {
                return Some(&segment[EXIF_HEADER.len()..]);
            }
        }
        pos += 2 + seg_len;
    }
    None
}

// ---------------------------------------------------------------------------
// TIFF IFD walking
// ---------------------------------------------------------------------------

const TAG_MAKE: u16 = 0x010F;
const TAG_MODEL: u16 = 0x0110;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_ISO: u16 = 0x8827;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

/// Bounds-checked reader over a TIFF block with its declared byte order.
struct Tiff<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> Tiff<'a> {
    fn u16_at(&self, offset: usize) -> Option<u16> {
        let b = self.data.get(offset..offset + 2)?;
        Some(if self.big_endian {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let b = self.data.get(offset..offset + 4)?;
        Some(if self.big_endian {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        })
    }

    /// Raw value bytes of an IFD entry: inline in the 4-byte value field
    /// when they fit, behind an offset otherwise.
    fn value_bytes(&self, entry_offset: usize, byte_len: usize) -> Option<&'a [u8]> {
        if byte_len <= 4 {
            self.data.get(entry_offset + 8..entry_offset + 8 + byte_len)
        } else {
            let offset = self.u32_at(entry_offset + 8)? as usize;
            self.data.get(offset..offset + byte_len)
        }
    }

    fn ascii_at(&self, entry_offset: usize, byte_len: usize) -> Option<String> {
        let bytes = self.value_bytes(entry_offset, byte_len)?;
        let text = String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    }

    fn rational_at(&self, entry_offset: usize) -> Option<f64> {
        let bytes_offset = self.u32_at(entry_offset + 8)? as usize;
        let num = self.u32_at(bytes_offset)? as f64;
        let den = self.u32_at(bytes_offset + 4)? as f64;
        (den != 0.0).then_some(num / den)
    }
}

/// TIFF type sizes: count is number of values, not bytes.
fn type_size(typ: u16) -> usize {
    match typ {
        1 | 2 | 6 | 7 => 1, // BYTE, ASCII, SBYTE, UNDEFINED
        3 | 8 => 2,         // SHORT, SSHORT
        4 | 9 | 11 => 4,    // LONG, SLONG, FLOAT
        5 | 10 | 12 => 8,   // RATIONAL, SRATIONAL, DOUBLE
        _ => 1,
    }
}

/// Parse the fields of interest out of a TIFF block.
///
/// Lenient on structure: anything truncated or unexpected just leaves the
/// remaining fields empty.
fn parse_tiff(tiff: &[u8]) -> ExifData {
    let mut result = ExifData::default();

    let big_endian = match tiff.get(0..2) {
        Some(b"MM") => true,
        Some(b"II") => false,
        _ => return result,
    };
    let reader = Tiff { data: tiff, big_endian };

    // TIFF magic
    if reader.u16_at(2) != Some(42) {
        return result;
    }
    let Some(ifd0) = reader.u32_at(4) else {
        return result;
    };

    let mut exif_ifd_offset = None;
    walk_ifd(&reader, ifd0 as usize, |tag, typ, count, entry_offset| {
        let byte_len = count * type_size(typ);
        match tag {
            TAG_MAKE => result.make = reader.ascii_at(entry_offset, byte_len),
            TAG_MODEL => result.model = reader.ascii_at(entry_offset, byte_len),
            TAG_EXIF_IFD => exif_ifd_offset = reader.u32_at(entry_offset + 8),
            _ => {}
        }
    });

    if let Some(offset) = exif_ifd_offset {
        walk_ifd(&reader, offset as usize, |tag, typ, count, entry_offset| {
            let byte_len = count * type_size(typ);
            match tag {
                TAG_F_NUMBER => result.f_number = reader.rational_at(entry_offset),
                TAG_ISO => {
                    result.iso = reader.u16_at(entry_offset + 8).map(u32::from);
                }
                TAG_DATE_TIME_ORIGINAL => {
                    result.taken = reader.ascii_at(entry_offset, byte_len);
                }
                _ => {}
            }
        });
    }

    result
}

/// Visit each entry of one IFD: (tag, type, count, entry offset).
fn walk_ifd(reader: &Tiff, ifd_offset: usize, mut visit: impl FnMut(u16, u16, usize, usize)) {
    let Some(entry_count) = reader.u16_at(ifd_offset) else {
        return;
    };
    let entries_start = ifd_offset + 2;
    for i in 0..entry_count as usize {
        let entry_offset = entries_start + i * 12;
        let (Some(tag), Some(typ), Some(count)) = (
            reader.u16_at(entry_offset),
            reader.u16_at(entry_offset + 2),
            reader.u32_at(entry_offset + 4),
        ) else {
            return;
        };
        visit(tag, typ, count as usize, entry_offset);
    }
}
