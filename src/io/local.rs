use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::error::{Result, ZipError};

/// Open a local file for inspection.
///
/// The directory walk issues many small reads, so the file is buffered.
pub fn open_local(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(ZipError::SourceUnavailable)?;
    let metadata = file.metadata().map_err(ZipError::SourceUnavailable)?;
    if metadata.is_dir() {
        return Err(ZipError::SourceUnavailable(io::Error::other(format!(
            "{} is a directory",
            path.display()
        ))));
    }
    let size = metadata.len();
    tracing::debug!(path = %path.display(), size, "opened local source");
    Ok(BufReader::new(file))
}
