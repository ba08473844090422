//! Sources an inspection can read from.
//!
//! Every source is `Read + Seek`; a remote URL is fetched whole into memory
//! first and then read like a file.

mod http;
mod local;
#[cfg(test)]
mod test_server;

pub use http::HttpFetcher;
pub use local::open_local;

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

/// A local file or a fetched remote body.
pub enum Source {
    Local(BufReader<File>),
    Remote(Cursor<Vec<u8>>),
}

impl Source {
    /// Open `location`, fetching it first when it is an HTTP(S) URL.
    pub async fn open(location: &str) -> Result<Self> {
        if is_http_url(location) {
            let fetcher = HttpFetcher::new()?;
            let body = fetcher.fetch(location).await?;
            tracing::debug!(
                url = location,
                bytes = fetcher.transferred_bytes(),
                "fetched remote source"
            );
            Ok(Source::Remote(Cursor::new(body)))
        } else {
            Ok(Source::Local(open_local(Path::new(location))?))
        }
    }
}

pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Local(file) => file.read(buf),
            Source::Remote(body) => body.read(buf),
        }
    }
}

impl Seek for Source {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Source::Local(file) => file.seek(pos),
            Source::Remote(body) => body.seek(pos),
        }
    }

    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        match self {
            Source::Local(file) => file.seek_relative(offset),
            Source::Remote(body) => body.seek_relative(offset),
        }
    }
}
