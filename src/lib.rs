//! # zipspy
//!
//! Find a ZIP archive embedded anywhere in a file and list its entries.
//!
//! Archives are often not at the start of the file that carries them: a ZIP can
//! be appended to an image, sit behind a self-extractor stub, or be followed by
//! unrelated bytes. This library locates the End of Central Directory record by
//! scanning backward for its signature, derives where the Central Directory
//! really starts from the directory size rather than from the recorded offset,
//! and walks the directory headers to yield each entry name as raw bytes.
//!
//! ## Features
//!
//! - Works on any `Read + Seek` source: files, in-memory buffers, fetched URLs
//! - Independent of how many bytes precede the archive
//! - Lazy, fail-fast directory walk with byte offsets in every error
//! - Optional discovery of every archive in a file
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use zipspy::zip::{entries, locate};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut file = File::open("photo.jpg")?;
//!
//!     match locate(&mut file)? {
//!         Some(offset) => {
//!             for name in entries(&mut file, offset)? {
//!                 println!("{}", name?);
//!             }
//!         }
//!         None => println!("no zip archive found"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod logging;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use io::{HttpFetcher, Source};
pub use zip::{Archive, EntryName, ZipInspector};
