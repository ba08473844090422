//! Locating embedded ZIP archives and listing their entries.
//!
//! ## Architecture
//!
//! - [`structures`]: record layouts (end record, central directory header) and entry names
//! - [`locator`]: backward signature scan for the end of central directory record
//! - [`walker`]: lazy walk over the central directory headers
//! - [`inspector`]: high-level API collecting whole archives
//!
//! ## Finding an archive anywhere in a file
//!
//! A ZIP file ends with:
//! 1. Local file headers and data for each entry
//! 2. The Central Directory, one header per entry
//! 3. The End of Central Directory (EOCD) record, plus an optional comment
//!
//! When the archive was appended to other data (an image, a self-extractor
//! stub), the offsets it records are relative to its own start rather than to
//! the file. The EOCD is therefore found by signature, and the Central
//! Directory start is derived as `eocd_offset - directory_size`.
//!
//! ## Limitations
//!
//! - Entry data is never read, decompressed or checksummed
//! - Zip64 escape values are read as-is; the Zip64 end record is not consulted
//! - Multi-disk fields are read but not interpreted

pub mod inspector;
pub mod locator;
pub mod structures;
pub mod walker;

#[cfg(test)]
pub(crate) mod fixture;

pub use inspector::{Archive, ZipInspector};
pub use locator::{locate, locate_all};
pub use structures::*;
pub use walker::{Entries, entries};
