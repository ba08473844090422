use serde::Serialize;
use std::io::{Read, Seek};

use crate::error::Result;

use super::locator::{locate, locate_all};
use super::structures::{EntryName, SummaryRecord};
use super::walker::entries;

/// One archive found inside a source.
#[derive(Debug, Clone, Serialize)]
pub struct Archive {
    /// Source offset of the end of central directory record.
    pub summary_offset: u64,
    /// Source offset of the first central directory header.
    pub table_start: u64,
    pub summary: SummaryRecord,
    pub entries: Vec<EntryName>,
}

/// Finds archives in a source and collects their entry names.
///
/// The inspector owns the source for its lifetime; pass `&mut source` to keep
/// using it afterwards.
pub struct ZipInspector<R> {
    reader: R,
}

impl<R: Read + Seek> ZipInspector<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// The archive whose end record closes the source, if any.
    pub fn find_archive(&mut self) -> Result<Option<Archive>> {
        match locate(&mut self.reader)? {
            Some(offset) => self.archive_at(offset).map(Some),
            None => Ok(None),
        }
    }

    /// Every archive in the source whose central directory walks cleanly,
    /// outermost first. Signatures that do not lead to a consistent
    /// directory are skipped.
    pub fn find_all_archives(&mut self) -> Result<Vec<Archive>> {
        let mut archives = Vec::new();

        for offset in locate_all(&mut self.reader)? {
            match self.archive_at(offset) {
                Ok(archive) => archives.push(archive),
                Err(e) if e.is_format_error() => {
                    tracing::debug!(offset, error = %e, "skipping signature");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(archives)
    }

    /// Walk the central directory closed by the end record at `offset`.
    pub fn archive_at(&mut self, offset: u64) -> Result<Archive> {
        let walk = entries(&mut self.reader, offset)?;
        let summary = *walk.summary();
        let table_start = walk.table_start();
        let entries = walk.collect::<Result<Vec<_>>>()?;

        Ok(Archive {
            summary_offset: offset,
            table_start,
            summary,
            entries,
        })
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::fixture::ArchiveBuilder;
    use std::io::Cursor;

    #[test]
    fn finds_nothing_in_plain_data() {
        let mut inspector = ZipInspector::new(Cursor::new(b"just some text, no archive".to_vec()));
        assert!(inspector.find_archive().unwrap().is_none());
        assert!(inspector.find_all_archives().unwrap().is_empty());
    }

    #[test]
    fn archive_records_both_offsets() {
        let fixture = ArchiveBuilder::new()
            .prefix(&[0xFF; 100])
            .entry(b"a.txt")
            .build();
        let mut inspector = ZipInspector::new(Cursor::new(fixture.bytes));
        let archive = inspector.find_archive().unwrap().unwrap();

        assert_eq!(archive.summary_offset, fixture.summary_offset);
        assert_eq!(archive.table_start, fixture.summary_offset - (46 + 5));
        // The recorded offset ignores the 100 prefix bytes.
        assert_eq!(archive.summary.directory_offset as u64 + 100, archive.table_start);
        assert_eq!(archive.entries, vec!["a.txt"]);
    }

    #[test]
    fn all_archives_are_found_outermost_first() {
        let inner = ArchiveBuilder::new().entry(b"inner.txt").build();
        let outer = ArchiveBuilder::new()
            .prefix(&inner.bytes)
            .entry(b"outer-1")
            .entry(b"outer-2")
            .build();

        let mut inspector = ZipInspector::new(Cursor::new(outer.bytes));
        let archives = inspector.find_all_archives().unwrap();

        assert_eq!(archives.len(), 2);
        assert_eq!(archives[0].entries, vec!["outer-1", "outer-2"]);
        assert_eq!(archives[1].entries, vec!["inner.txt"]);
        assert_eq!(archives[1].summary_offset, inner.summary_offset);
    }

    #[test]
    fn inconsistent_signatures_are_skipped_when_finding_all() {
        // A stray signature with an oversized directory in front of a real archive.
        let mut stray = SummaryRecord::SIGNATURE.to_le_bytes().to_vec();
        stray.extend_from_slice(&[0, 0, 0, 0, 1, 0, 1, 0]);
        stray.extend_from_slice(&500u32.to_le_bytes());
        stray.extend_from_slice(&[0u8; 6]);

        let fixture = ArchiveBuilder::new().prefix(&stray).entry(b"real").build();
        let mut inspector = ZipInspector::new(Cursor::new(fixture.bytes));
        let archives = inspector.find_all_archives().unwrap();

        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].entries, vec!["real"]);
    }

    #[test]
    fn archives_serialize_names_lossily() {
        let fixture = ArchiveBuilder::new().entry(b"ok").entry(&[0xFF, b'!']).build();
        let mut inspector = ZipInspector::new(Cursor::new(fixture.bytes));
        let archive = inspector.find_archive().unwrap().unwrap();

        let value = serde_json::to_value(&archive).unwrap();
        assert_eq!(value["summary"]["total_entries"], 2);
        assert_eq!(value["entries"][0]["name"], "ok");
        assert_eq!(value["entries"][0]["utf8"], true);
        assert_eq!(value["entries"][1]["name"], "\u{FFFD}!");
        assert_eq!(value["entries"][1]["utf8"], false);
    }
}
