//! Walking the central directory.
//!
//! The start of the central directory is computed as the end record offset
//! minus the directory size. The recorded directory offset is relative to the
//! start of the archive, which is not the start of the file whenever other
//! data precedes the archive, so it is never used for positioning.

use std::io::{Read, Seek, SeekFrom};
use std::iter::FusedIterator;

use crate::error::{Result, ZipError};

use super::structures::{EntryHeader, EntryLengths, EntryName, SummaryRecord};

/// Decode the end record at `offset` and position `reader` at the first
/// central directory header.
///
/// The returned iterator yields one name per header, exactly
/// `total_entries` times, and stops for good after the first error. It
/// cannot be restarted; call this again to walk the directory again.
#[tracing::instrument(skip(reader))]
pub fn entries<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<Entries<'_, R>> {
    let mut data = [0u8; SummaryRecord::SIZE];
    reader.seek(SeekFrom::Start(offset))?;
    reader
        .read_exact(&mut data)
        .map_err(|e| ZipError::from_read(e, "end of central directory record", offset, None))?;
    let summary = SummaryRecord::from_bytes(&data, offset)?;

    if summary.is_zip64() {
        tracing::warn!(?summary, "end record carries Zip64 escape values, reading them as-is");
    }

    let table_start = offset
        .checked_sub(summary.directory_size as u64)
        .ok_or(ZipError::DirectoryUnderflow {
            summary_offset: offset,
            directory_size: summary.directory_size,
        })?;

    if table_start != summary.directory_offset as u64 {
        tracing::debug!(
            table_start,
            recorded = summary.directory_offset,
            "archive starts {} bytes into the source",
            table_start.wrapping_sub(summary.directory_offset as u64)
        );
    }

    reader.seek(SeekFrom::Start(table_start))?;

    Ok(Entries {
        reader,
        summary,
        summary_offset: offset,
        table_start,
        position: table_start,
        index: 0,
        failed: false,
    })
}

/// Lazy sequence of entry names from one central directory.
pub struct Entries<'a, R> {
    reader: &'a mut R,
    summary: SummaryRecord,
    summary_offset: u64,
    table_start: u64,
    /// Source offset of the next header.
    position: u64,
    /// Index of the next header.
    index: u64,
    failed: bool,
}

impl<R> Entries<'_, R> {
    pub fn summary(&self) -> &SummaryRecord {
        &self.summary
    }

    pub fn summary_offset(&self) -> u64 {
        self.summary_offset
    }

    /// Source offset of the first central directory header.
    pub fn table_start(&self) -> u64 {
        self.table_start
    }

    fn remaining(&self) -> u64 {
        if self.failed {
            0
        } else {
            self.summary.total_entries as u64 - self.index
        }
    }
}

impl<R: Read + Seek> Entries<'_, R> {
    fn read_entry(&mut self) -> Result<EntryName> {
        let offset = self.position;
        let index = Some(self.index);
        let read_err =
            move |what: &'static str| move |e: std::io::Error| ZipError::from_read(e, what, offset, index);

        let mut header = [0u8; EntryHeader::SIZE];
        let (signature_bytes, fixed) = header.split_at_mut(EntryHeader::FIELD_SIGNATURE.end());

        self.reader
            .read_exact(signature_bytes)
            .map_err(read_err("central directory header"))?;
        let signature = EntryHeader::FIELD_SIGNATURE.read_u32(signature_bytes)?;
        if signature != EntryHeader::SIGNATURE {
            return Err(ZipError::UnexpectedSignature {
                what: "central directory header",
                offset,
                index,
                actual: signature,
                expected: EntryHeader::SIGNATURE,
            });
        }

        self.reader
            .read_exact(fixed)
            .map_err(read_err("central directory header"))?;
        let lengths = EntryLengths::from_header(&header)?;

        let mut name = vec![0u8; lengths.name as usize];
        self.reader.read_exact(&mut name).map_err(read_err("entry name"))?;

        // Extra field and entry comment are skipped unread. A relative seek
        // keeps a buffered reader's buffer when the skip lands inside it.
        if lengths.trailing() > 0 {
            self.reader.seek_relative(lengths.trailing() as i64)?;
        }

        self.position += EntryHeader::SIZE as u64 + lengths.name as u64 + lengths.trailing();
        tracing::trace!(index = self.index, offset, ?lengths, "central directory header");

        Ok(EntryName::from(name))
    }
}

impl<R: Read + Seek> Iterator for Entries<'_, R> {
    type Item = Result<EntryName>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        match self.read_entry() {
            Ok(name) => {
                self.index += 1;
                if self.remaining() == 0 && self.position != self.summary_offset {
                    tracing::warn!(
                        end = self.position,
                        summary_offset = self.summary_offset,
                        "central directory does not end at the end record"
                    );
                }
                Some(Ok(name))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining() as usize))
    }
}

impl<R: Read + Seek> FusedIterator for Entries<'_, R> {}
