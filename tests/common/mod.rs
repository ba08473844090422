#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

/// A real archive written by the `zip` crate. Names ending in '/' become
/// directory entries.
pub fn zip_archive(names: &[&str], comment: Option<&str>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for name in names {
        if name.ends_with('/') {
            writer.add_directory(*name, options()).unwrap();
        } else {
            writer.start_file(*name, options()).unwrap();
            writer.write_all(format!("contents of {name}").as_bytes()).unwrap();
        }
    }
    if let Some(comment) = comment {
        writer.set_comment(comment);
    }

    writer.finish().unwrap().into_inner()
}

/// The first bytes of a JPEG file, padded to `len` bytes.
pub fn jpeg_like_prefix(len: usize) -> Vec<u8> {
    let mut prefix = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00".to_vec();
    prefix.extend((prefix.len()..len).map(|i| (i * 31 % 251) as u8));
    prefix.truncate(len);
    prefix
}

/// Overwrite the total entry count of the end record closing `bytes`.
pub fn set_total_entries(bytes: &mut [u8], count: u16) {
    let at = bytes.len() - 22 + 10;
    bytes[at..at + 2].copy_from_slice(&count.to_le_bytes());
}
