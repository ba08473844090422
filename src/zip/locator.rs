//! Locating the end of central directory record.
//!
//! An archive may sit at any offset inside a file (appended to an image, behind
//! a self-extractor stub) and may be followed by a comment or stray bytes, so
//! the record is found by scanning backward from the end for its signature.
//!
//! The scan reads fixed-size windows in reverse and searches each window from
//! its end, overlapping consecutive windows by `SIGNATURE_LENGTH - 1` bytes so
//! a signature straddling a window boundary is still seen.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Result, ZipError};

use super::structures::SummaryRecord;

/// Size of the stack buffer used for each scan window.
const BUFFER_SIZE: usize = 4096;

const SIGNATURE_LENGTH: u64 = 4;

/// Maximum archive comment size allowed by the format.
const MAX_COMMENT_SIZE: u64 = u16::MAX as u64;

/// Reverse scan over every offset at which a complete end record could start.
///
/// Candidates run from `len - SummaryRecord::SIZE` down to `floor` inclusive.
struct SignatureScan {
    /// Exclusive end of the bytes not yet searched.
    end: u64,
    /// Lowest offset still of interest.
    floor: u64,
}

impl SignatureScan {
    fn new(length: u64) -> Self {
        let end = match length.checked_sub(SummaryRecord::SIZE as u64) {
            Some(last_candidate) => last_candidate + SIGNATURE_LENGTH,
            None => 0,
        };
        Self { end, floor: 0 }
    }

    /// Stop reporting candidates below `floor`.
    fn raise_floor(&mut self, floor: u64) {
        self.floor = self.floor.max(floor);
    }

    /// Offset of the next signature toward the start of the source.
    fn next_match<R: Read + Seek>(&mut self, reader: &mut R) -> Result<Option<u64>> {
        let signature = SummaryRecord::SIGNATURE.to_le_bytes();
        let mut buffer = [0u8; BUFFER_SIZE];

        while self.end >= self.floor + SIGNATURE_LENGTH {
            let start = self.end.saturating_sub(BUFFER_SIZE as u64).max(self.floor);
            let window = &mut buffer[..(self.end - start) as usize];

            reader.seek(SeekFrom::Start(start))?;
            reader
                .read_exact(window)
                .map_err(|e| ZipError::from_read(e, "scan window", start, None))?;

            if let Some(index) = window.windows(signature.len()).rposition(|w| w == signature) {
                let found = start + index as u64;
                // Resume just below this match.
                self.end = found + SIGNATURE_LENGTH - 1;
                return Ok(Some(found));
            }

            if start == self.floor {
                break;
            }
            self.end = start + SIGNATURE_LENGTH - 1;
        }

        self.end = self.floor;
        Ok(None)
    }
}

/// Read the comment length of a candidate record at `offset`.
fn read_comment_length<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<u64> {
    let field = offset + SummaryRecord::FIELD_COMMENT_LENGTH.offset as u64;
    reader.seek(SeekFrom::Start(field))?;
    let length = reader
        .read_u16::<LittleEndian>()
        .map_err(|e| ZipError::from_read(e, "end of central directory record", offset, None))?;
    Ok(length as u64)
}

/// Find the offset of the end of central directory record, if any.
///
/// Scanning from the end, the first signature whose declared comment ends
/// exactly at the end of the source wins. This rejects signature bytes that
/// merely appear inside the archive comment. When no candidate closes the
/// source exactly (bytes were appended after the archive), the last signature
/// occurrence in the source is used instead.
///
/// Returns `Ok(None)` when no signature is present, including for sources
/// shorter than one record. The source position is unspecified afterwards.
#[tracing::instrument(skip(reader))]
pub fn locate<R: Read + Seek>(reader: &mut R) -> Result<Option<u64>> {
    let length = reader.seek(SeekFrom::End(0))?;
    if length < SummaryRecord::SIZE as u64 {
        tracing::debug!(length, "source shorter than an end record");
        return Ok(None);
    }

    // Only candidates this close to the end can carry an exact comment.
    let exact_floor = length.saturating_sub(SummaryRecord::SIZE as u64 + MAX_COMMENT_SIZE);

    let mut scan = SignatureScan::new(length);
    let mut fallback = None;

    while let Some(candidate) = scan.next_match(reader)? {
        if candidate < exact_floor {
            tracing::debug!(candidate, "no exact trailer, using last signature");
            return Ok(Some(fallback.unwrap_or(candidate)));
        }

        let comment_length = read_comment_length(reader, candidate)?;
        if candidate + SummaryRecord::SIZE as u64 + comment_length == length {
            tracing::debug!(candidate, comment_length, "located end record");
            return Ok(Some(candidate));
        }

        tracing::trace!(candidate, comment_length, "signature does not close the source");
        if fallback.is_none() {
            fallback = Some(candidate);
            scan.raise_floor(exact_floor);
        }
    }

    if let Some(offset) = fallback {
        tracing::debug!(offset, "no exact trailer, using last signature");
    }
    Ok(fallback)
}

/// Every end record signature in the source, from the end toward the start.
#[tracing::instrument(skip(reader))]
pub fn locate_all<R: Read + Seek>(reader: &mut R) -> Result<Vec<u64>> {
    let length = reader.seek(SeekFrom::End(0))?;
    let mut scan = SignatureScan::new(length);
    let mut offsets = Vec::new();

    while let Some(candidate) = scan.next_match(reader)? {
        offsets.push(candidate);
    }

    tracing::debug!(count = offsets.len(), "signature scan finished");
    Ok(offsets)
}
