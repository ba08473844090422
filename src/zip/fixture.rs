//! Hand-assembled archives for unit tests.

use super::structures::{EntryHeader, SummaryRecord};

struct FixtureEntry {
    name: Vec<u8>,
    extra: Vec<u8>,
    comment: Vec<u8>,
}

/// Builds the central directory and end record of an archive, with a stand-in
/// data region in front and optional bytes before and after the archive.
#[derive(Default)]
pub(crate) struct ArchiveBuilder {
    prefix: Vec<u8>,
    entries: Vec<FixtureEntry>,
    comment: Vec<u8>,
    claimed_entries: Option<u16>,
    trailing: Vec<u8>,
}

/// A built archive and the offset of its end record.
pub(crate) struct Fixture {
    pub bytes: Vec<u8>,
    pub summary_offset: u64,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, bytes: &[u8]) -> Self {
        self.prefix = bytes.to_vec();
        self
    }

    pub fn entry(self, name: &[u8]) -> Self {
        self.entry_with(name, b"", b"")
    }

    pub fn entry_with(mut self, name: &[u8], extra: &[u8], comment: &[u8]) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_vec(),
            extra: extra.to_vec(),
            comment: comment.to_vec(),
        });
        self
    }

    pub fn comment(mut self, bytes: &[u8]) -> Self {
        self.comment = bytes.to_vec();
        self
    }

    /// Record a different entry count than the entries actually written.
    pub fn claim_entries(mut self, count: u16) -> Self {
        self.claimed_entries = Some(count);
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing = bytes.to_vec();
        self
    }

    pub fn build(&self) -> Fixture {
        let mut bytes = self.prefix.clone();
        let archive_start = bytes.len();

        let mut local_offsets = Vec::new();
        for entry in &self.entries {
            local_offsets.push((bytes.len() - archive_start) as u32);
            bytes.extend_from_slice(b"PK\x03\x04");
            bytes.extend_from_slice(&entry.name);
        }

        let directory_start = bytes.len();
        for (entry, local_offset) in self.entries.iter().zip(local_offsets) {
            let mut header = [0u8; EntryHeader::SIZE];
            header[..4].copy_from_slice(&EntryHeader::SIGNATURE.to_le_bytes());
            put_u16(&mut header, EntryHeader::FIELD_NAME_LENGTH.offset, entry.name.len() as u16);
            put_u16(&mut header, EntryHeader::FIELD_EXTRA_LENGTH.offset, entry.extra.len() as u16);
            put_u16(&mut header, EntryHeader::FIELD_COMMENT_LENGTH.offset, entry.comment.len() as u16);
            header[42..46].copy_from_slice(&local_offset.to_le_bytes());

            bytes.extend_from_slice(&header);
            bytes.extend_from_slice(&entry.name);
            bytes.extend_from_slice(&entry.extra);
            bytes.extend_from_slice(&entry.comment);
        }

        let summary_offset = bytes.len();
        let count = self.claimed_entries.unwrap_or(self.entries.len() as u16);
        let mut record = [0u8; SummaryRecord::SIZE];
        record[..4].copy_from_slice(&SummaryRecord::SIGNATURE.to_le_bytes());
        put_u16(&mut record, SummaryRecord::FIELD_ENTRIES_ON_THIS_DISK.offset, count);
        put_u16(&mut record, SummaryRecord::FIELD_TOTAL_ENTRIES.offset, count);
        put_u32(
            &mut record,
            SummaryRecord::FIELD_DIRECTORY_SIZE.offset,
            (summary_offset - directory_start) as u32,
        );
        put_u32(
            &mut record,
            SummaryRecord::FIELD_DIRECTORY_OFFSET.offset,
            (directory_start - archive_start) as u32,
        );
        put_u16(&mut record, SummaryRecord::FIELD_COMMENT_LENGTH.offset, self.comment.len() as u16);

        bytes.extend_from_slice(&record);
        bytes.extend_from_slice(&self.comment);
        bytes.extend_from_slice(&self.trailing);

        Fixture {
            bytes,
            summary_offset: summary_offset as u64,
        }
    }
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
