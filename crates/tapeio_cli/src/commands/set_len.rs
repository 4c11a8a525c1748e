//! Set-len command implementation.

use super::{open_file, Access};
use crate::error::CliResult;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink};

/// Result of resizing a file.
#[derive(Debug, Serialize)]
pub struct SetLenReport {
    /// File path.
    pub path: String,
    /// Length before the resize.
    pub previous: u64,
    /// Length after the resize.
    pub length: u64,
}

impl fmt::Display for SetLenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} bytes",
            self.path, self.previous, self.length
        )
    }
}

/// Runs the set-len command.
pub fn run<S: LogSink>(io: &FileIo<S>, path: &Path, length: u64) -> CliResult<SetLenReport> {
    let mut file = open_file(path, Access::Write)?;
    let previous = io.length(&file)?;

    io.set_length(&mut file, length)?;
    tracing::info!(previous, length, "resized file");

    Ok(SetLenReport {
        path: path.display().to_string(),
        previous,
        length: io.length(&file)?,
    })
}
