//! Error types reported while locating and walking an archive.
//!
//! "No archive present" is not an error: the locator reports it as `Ok(None)`.
//! Everything here is fatal for the current inspection.

use std::io;

use thiserror::Error;

/// A Result type alias over [`ZipError`].
pub type Result<V> = std::result::Result<V, ZipError>;

/// Errors surfaced by the locator, the walker and the CLI collaborators.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    /// The underlying source could not be opened, seeked or read.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] io::Error),

    /// Fewer bytes were available than a record requires.
    #[error("truncated {what} at offset {offset:#x}{}", entry_suffix(.index))]
    Truncated {
        what: &'static str,
        offset: u64,
        index: Option<u64>,
    },

    /// A record did not start with the signature expected at that position.
    #[error(
        "unexpected {what} signature at offset {offset:#x}{} (actual: {actual:#010x}, expected: {expected:#010x})",
        entry_suffix(.index)
    )]
    UnexpectedSignature {
        what: &'static str,
        offset: u64,
        index: Option<u64>,
        actual: u32,
        expected: u32,
    },

    /// The central directory claims to be larger than everything before the
    /// end record, so its start would lie before the beginning of the source.
    #[error(
        "central directory of {directory_size} bytes cannot precede the end record at offset {summary_offset:#x}"
    )]
    DirectoryUnderflow {
        summary_offset: u64,
        directory_size: u32,
    },

    /// The remote fetch collaborator failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl ZipError {
    /// Whether this error describes malformed archive data rather than an
    /// unavailable source.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ZipError::Truncated { .. }
                | ZipError::UnexpectedSignature { .. }
                | ZipError::DirectoryUnderflow { .. }
        )
    }

    /// Map an I/O failure from reading `what` at `offset`. A short read means
    /// the data is truncated; anything else means the source itself failed.
    pub(crate) fn from_read(err: io::Error, what: &'static str, offset: u64, index: Option<u64>) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ZipError::Truncated { what, offset, index }
        } else {
            ZipError::SourceUnavailable(err)
        }
    }
}

impl From<io::Error> for ZipError {
    fn from(err: io::Error) -> Self {
        ZipError::SourceUnavailable(err)
    }
}

fn entry_suffix(index: &Option<u64>) -> String {
    match index {
        Some(index) => format!(" (entry {index})"),
        None => String::new(),
    }
}
