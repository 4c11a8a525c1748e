//! Copy command implementation.

use super::{open_file, Access};
use crate::error::CliResult;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink};

/// Result of relocating a region.
#[derive(Debug, Serialize)]
pub struct CopyReport {
    /// File path.
    pub path: String,
    /// Source offset.
    pub source: u64,
    /// Destination offset.
    pub destination: u64,
    /// Bytes copied.
    pub length: u64,
    /// Chunk size used for the copy.
    pub chunk_size: usize,
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: copied {} bytes from {} to {} ({} byte chunks)",
            self.path, self.length, self.source, self.destination, self.chunk_size
        )
    }
}

/// Runs the copy command.
pub fn run<S: LogSink>(
    io: &FileIo<S>,
    path: &Path,
    source: u64,
    destination: u64,
    length: u64,
) -> CliResult<CopyReport> {
    let mut file = open_file(path, Access::Write)?;

    io.transfer_to(&mut file, source, destination, length)?;
    tracing::info!(source, destination, length, "copied region");

    Ok(CopyReport {
        path: path.display().to_string(),
        source,
        destination,
        length,
        chunk_size: io.config().copy_buffer_size,
    })
}
