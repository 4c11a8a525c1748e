//! Stat command implementation.

use super::{open_file, Access};
use crate::error::CliResult;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink, RandomAccessFile};

/// File statistics.
#[derive(Debug, Serialize)]
pub struct StatReport {
    /// File path.
    pub path: String,
    /// File length in bytes.
    pub length: u64,
    /// Handle id used in diagnostics.
    pub handle: u64,
}

impl fmt::Display for StatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "path:   {}", self.path)?;
        writeln!(f, "length: {} bytes", self.length)?;
        write!(f, "handle: {}", self.handle)
    }
}

/// Runs the stat command.
pub fn run<S: LogSink>(io: &FileIo<S>, path: &Path) -> CliResult<StatReport> {
    let file = open_file(path, Access::Read)?;
    Ok(StatReport {
        path: path.display().to_string(),
        length: io.length(&file)?,
        handle: file.handle_id(),
    })
}
