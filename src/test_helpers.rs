//! Shared test utilities for the travelogue test suite.
//!
//! The EXIF test fixtures are synthesized in memory: a minimal JPEG wrapper
//! around a hand-assembled little-endian TIFF block, so metadata tests run
//! without binary fixture files.

use std::fs;
use std::io;
use std::path::Path;

// =========================================================================
// Synthetic EXIF JPEG builder (little-endian TIFF)
// =========================================================================

pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_EXIF_IFD: u16 = 0x8769;
pub const TAG_F_NUMBER: u16 = 0x829D;
pub const TAG_ISO: u16 = 0x8827;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

pub struct Entry {
    tag: u16,
    typ: u16,
    count: u32,
    value: EntryValue,
}

enum EntryValue {
    Inline([u8; 4]),
    Data(Vec<u8>),
}

pub fn ascii_entry(tag: u16, text: &str) -> Entry {
    let mut data = text.as_bytes().to_vec();
    data.push(0);
    Entry {
        tag,
        typ: 2,
        count: data.len() as u32,
        value: EntryValue::Data(data),
    }
}

pub fn rational_entry(tag: u16, num: u32, den: u32) -> Entry {
    let mut data = Vec::new();
    data.extend_from_slice(&num.to_le_bytes());
    data.extend_from_slice(&den.to_le_bytes());
    Entry {
        tag,
        typ: 5,
        count: 1,
        value: EntryValue::Data(data),
    }
}

pub fn short_entry(tag: u16, value: u16) -> Entry {
    let mut inline = [0u8; 4];
    inline[..2].copy_from_slice(&value.to_le_bytes());
    Entry {
        tag,
        typ: 3,
        count: 1,
        value: EntryValue::Inline(inline),
    }
}

pub fn long_entry(tag: u16, value: u32) -> Entry {
    Entry {
        tag,
        typ: 4,
        count: 1,
        value: EntryValue::Inline(value.to_le_bytes()),
    }
}

/// Serialize one IFD at `ifd_offset`, appending out-of-line data after the
/// entry table. Returns the bytes from `ifd_offset` onward.
fn build_ifd(entries: &[Entry], ifd_offset: usize) -> Vec<u8> {
    let table_len = 2 + entries.len() * 12 + 4;
    let mut table = Vec::new();
    let mut data = Vec::new();
    table.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        table.extend_from_slice(&entry.tag.to_le_bytes());
        table.extend_from_slice(&entry.typ.to_le_bytes());
        table.extend_from_slice(&entry.count.to_le_bytes());
        match &entry.value {
            EntryValue::Inline(bytes) => table.extend_from_slice(bytes),
            EntryValue::Data(bytes) if bytes.len() <= 4 => {
                let mut inline = [0u8; 4];
                inline[..bytes.len()].copy_from_slice(bytes);
                table.extend_from_slice(&inline);
            }
            EntryValue::Data(bytes) => {
                let offset = (ifd_offset + table_len + data.len()) as u32;
                table.extend_from_slice(&offset.to_le_bytes());
                data.extend_from_slice(bytes);
            }
        }
    }
    table.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    table.extend_from_slice(&data);
    table
}

pub fn build_tiff(mut ifd0: Vec<Entry>, sub: Vec<Entry>) -> Vec<u8> {
    // Header, IFD0 at 8, sub-IFD directly after IFD0's table + data.
    // The sub-IFD pointer entry is inline, so the offset is computable up
    // front from the entry count and out-of-line data size.
    let entry_count = ifd0.len() + usize::from(!sub.is_empty());
    let data_len: usize = ifd0
        .iter()
        .map(|e| match &e.value {
            EntryValue::Data(d) if d.len() > 4 => d.len(),
            _ => 0,
        })
        .sum();
    let sub_offset = 8 + 2 + entry_count * 12 + 4 + data_len;
    if !sub.is_empty() {
        ifd0.push(long_entry(TAG_EXIF_IFD, sub_offset as u32));
    }

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&build_ifd(&ifd0, 8));
    if !sub.is_empty() {
        assert_eq!(tiff.len(), sub_offset);
        tiff.extend_from_slice(&build_ifd(&sub, sub_offset));
    }
    tiff
}

pub fn exif_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];
    let seg_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&seg_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// A JPEG carrying the full caption field set:
/// FUJIFILM X100F, F/2.8, ISO 400, taken 2018:05:01 14:03:22.
pub fn sample_jpeg() -> Vec<u8> {
    let tiff = build_tiff(
        vec![
            ascii_entry(TAG_MAKE, "FUJIFILM"),
            ascii_entry(TAG_MODEL, "X100F"),
        ],
        vec![
            rational_entry(TAG_F_NUMBER, 28, 10),
            short_entry(TAG_ISO, 400),
            ascii_entry(TAG_DATE_TIME_ORIGINAL, "2018:05:01 14:03:22"),
        ],
    );
    exif_jpeg(&tiff)
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
