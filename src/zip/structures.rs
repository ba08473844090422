use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;

use crate::error::{Result, ZipError};

/// One row of a fixed record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Byte offset from the start of the record (signature included).
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
    pub meaning: &'static str,
}

impl Field {
    const fn new(name: &'static str, offset: usize, width: usize, meaning: &'static str) -> Self {
        Self {
            name,
            offset,
            width,
            meaning,
        }
    }

    /// Offset of the first byte after this field.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    pub(crate) fn read_u16(&self, record: &[u8]) -> Result<u16> {
        let mut cursor = Cursor::new(&record[self.offset..self.end()]);
        Ok(cursor.read_u16::<LittleEndian>()?)
    }

    pub(crate) fn read_u32(&self, record: &[u8]) -> Result<u32> {
        let mut cursor = Cursor::new(&record[self.offset..self.end()]);
        Ok(cursor.read_u32::<LittleEndian>()?)
    }
}

/// End of Central Directory record - 22 bytes plus a variable comment.
///
/// Every archive is closed by exactly one of these. Its `directory_offset`
/// assumes the archive starts at byte 0 of the file, which is false for
/// anything with a prefix, so only `directory_size` is used to find the
/// central directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub disk_number: u16,
    pub start_disk_number: u16,
    pub entries_on_this_disk: u16,
    pub total_entries: u16,
    pub directory_size: u32,
    pub directory_offset: u32,
    pub comment_length: u16,
}

impl SummaryRecord {
    pub const SIGNATURE: u32 = 0x06054b50;
    pub const SIZE: usize = 22;

    pub const FIELD_SIGNATURE: Field = Field::new("signature", 0, 4, "PK\\x05\\x06");
    pub const FIELD_DISK_NUMBER: Field = Field::new("disk_number", 4, 2, "number of this disk");
    pub const FIELD_START_DISK_NUMBER: Field =
        Field::new("start_disk_number", 6, 2, "disk holding the start of the central directory");
    pub const FIELD_ENTRIES_ON_THIS_DISK: Field =
        Field::new("entries_on_this_disk", 8, 2, "central directory entries on this disk");
    pub const FIELD_TOTAL_ENTRIES: Field = Field::new("total_entries", 10, 2, "central directory entries in total");
    pub const FIELD_DIRECTORY_SIZE: Field = Field::new("directory_size", 12, 4, "central directory size in bytes");
    pub const FIELD_DIRECTORY_OFFSET: Field =
        Field::new("directory_offset", 16, 4, "central directory offset relative to the archive start");
    pub const FIELD_COMMENT_LENGTH: Field = Field::new("comment_length", 20, 2, "archive comment length");

    pub const LAYOUT: [Field; 8] = [
        Self::FIELD_SIGNATURE,
        Self::FIELD_DISK_NUMBER,
        Self::FIELD_START_DISK_NUMBER,
        Self::FIELD_ENTRIES_ON_THIS_DISK,
        Self::FIELD_TOTAL_ENTRIES,
        Self::FIELD_DIRECTORY_SIZE,
        Self::FIELD_DIRECTORY_OFFSET,
        Self::FIELD_COMMENT_LENGTH,
    ];

    /// Decode a record found at `offset`. `data` must hold at least
    /// [`Self::SIZE`] bytes starting with the signature.
    pub fn from_bytes(data: &[u8], offset: u64) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(ZipError::Truncated {
                what: "end of central directory record",
                offset,
                index: None,
            });
        }

        let signature = Self::FIELD_SIGNATURE.read_u32(data)?;
        if signature != Self::SIGNATURE {
            return Err(ZipError::UnexpectedSignature {
                what: "end of central directory record",
                offset,
                index: None,
                actual: signature,
                expected: Self::SIGNATURE,
            });
        }

        Ok(Self {
            disk_number: Self::FIELD_DISK_NUMBER.read_u16(data)?,
            start_disk_number: Self::FIELD_START_DISK_NUMBER.read_u16(data)?,
            entries_on_this_disk: Self::FIELD_ENTRIES_ON_THIS_DISK.read_u16(data)?,
            total_entries: Self::FIELD_TOTAL_ENTRIES.read_u16(data)?,
            directory_size: Self::FIELD_DIRECTORY_SIZE.read_u32(data)?,
            directory_offset: Self::FIELD_DIRECTORY_OFFSET.read_u32(data)?,
            comment_length: Self::FIELD_COMMENT_LENGTH.read_u16(data)?,
        })
    }

    /// Whether any field carries a Zip64 escape value. These are read
    /// through as-is; the extended record is never consulted.
    pub fn is_zip64(&self) -> bool {
        self.entries_on_this_disk == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.directory_size == 0xFFFFFFFF
            || self.directory_offset == 0xFFFFFFFF
    }
}

/// Central Directory File Header - 46 fixed bytes followed by the name, the
/// extra field and the entry comment.
///
/// Only the signature and the three length fields are decoded; everything
/// else is described here so the skipped bytes are accounted for.
pub struct EntryHeader;

impl EntryHeader {
    pub const SIGNATURE: u32 = 0x02014b50;
    pub const SIZE: usize = 46;

    pub const FIELD_SIGNATURE: Field = Field::new("signature", 0, 4, "PK\\x01\\x02");
    pub const FIELD_NAME_LENGTH: Field = Field::new("name_length", 28, 2, "file name length");
    pub const FIELD_EXTRA_LENGTH: Field = Field::new("extra_length", 30, 2, "extra field length");
    pub const FIELD_COMMENT_LENGTH: Field = Field::new("comment_length", 32, 2, "file comment length");

    pub const LAYOUT: [Field; 17] = [
        Self::FIELD_SIGNATURE,
        Field::new("version_made_by", 4, 2, "opaque"),
        Field::new("version_needed", 6, 2, "opaque"),
        Field::new("flags", 8, 2, "opaque"),
        Field::new("compression_method", 10, 2, "opaque"),
        Field::new("last_mod_time", 12, 2, "opaque"),
        Field::new("last_mod_date", 14, 2, "opaque"),
        Field::new("crc32", 16, 4, "opaque"),
        Field::new("compressed_size", 20, 4, "opaque"),
        Field::new("uncompressed_size", 24, 4, "opaque"),
        Self::FIELD_NAME_LENGTH,
        Self::FIELD_EXTRA_LENGTH,
        Self::FIELD_COMMENT_LENGTH,
        Field::new("disk_number_start", 34, 2, "opaque"),
        Field::new("internal_attributes", 36, 2, "opaque"),
        Field::new("external_attributes", 38, 4, "opaque"),
        Field::new("local_header_offset", 42, 4, "opaque"),
    ];
}

/// The variable-length tail sizes of one entry header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLengths {
    pub name: u16,
    pub extra: u16,
    pub comment: u16,
}

impl EntryLengths {
    /// Decode the length triplet from a fixed header whose signature has
    /// already been checked.
    pub fn from_header(header: &[u8; EntryHeader::SIZE]) -> Result<Self> {
        Ok(Self {
            name: EntryHeader::FIELD_NAME_LENGTH.read_u16(header)?,
            extra: EntryHeader::FIELD_EXTRA_LENGTH.read_u16(header)?,
            comment: EntryHeader::FIELD_COMMENT_LENGTH.read_u16(header)?,
        })
    }

    /// Bytes after the name that belong to this entry.
    pub fn trailing(&self) -> u64 {
        self.extra as u64 + self.comment as u64
    }
}

/// An entry name exactly as stored. No charset conversion is applied since
/// archives record names in whatever encoding their writer used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(Vec<u8>);

impl EntryName {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_utf8(&self) -> bool {
        std::str::from_utf8(&self.0).is_ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Directory entries end with '/'.
    pub fn is_directory(&self) -> bool {
        self.0.last() == Some(&b'/')
    }
}

impl From<Vec<u8>> for EntryName {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl PartialEq<&str> for EntryName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// Serialized as `{ "name": <lossy UTF-8>, "utf8": <bool> }`.
impl Serialize for EntryName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EntryName", 2)?;
        state.serialize_field("name", &self.to_string_lossy())?;
        state.serialize_field("utf8", &self.is_utf8())?;
        state.end()
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
