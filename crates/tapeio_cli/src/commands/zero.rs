//! Zero command implementation.

use super::{open_file, Access};
use crate::error::CliResult;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink};

/// Result of zero-filling a region.
#[derive(Debug, Serialize)]
pub struct ZeroReport {
    /// File path.
    pub path: String,
    /// Start of the zeroed region.
    pub offset: u64,
    /// Number of zero bytes written.
    pub length: u64,
}

impl fmt::Display for ZeroReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: zeroed {} bytes at offset {}",
            self.path, self.length, self.offset
        )
    }
}

/// Runs the zero command.
pub fn run<S: LogSink>(
    io: &FileIo<S>,
    path: &Path,
    offset: u64,
    length: u64,
) -> CliResult<ZeroReport> {
    let mut file = open_file(path, Access::Write)?;

    io.seek(&mut file, offset)?;
    io.write_zeros(&mut file, length)?;
    tracing::info!(offset, length, "zeroed region");

    Ok(ZeroReport {
        path: path.display().to_string(),
        offset,
        length,
    })
}
