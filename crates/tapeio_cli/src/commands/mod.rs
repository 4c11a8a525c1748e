//! CLI command implementations.
//!
//! Each command opens the file itself, drives it through
//! [`tapeio_fileio::FileIo`] and returns a serializable report. The file is
//! closed, and its lock released, when the command returns on any path.

pub mod copy;
pub mod digest;
pub mod dump;
pub mod set_len;
pub mod stat;
pub mod zero;

use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use fs2::FileExt;
use serde::Serialize;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink};

/// Output format for command reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// How a command accesses its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read only, shared lock.
    Read,
    /// Read and write, exclusive lock.
    Write,
}

/// Opens an existing file and locks it for the given access.
///
/// The lock is advisory and released when the file is dropped.
pub fn open_file(path: &Path, access: Access) -> CliResult<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(access == Access::Write)
        .open(path)
        .map_err(|source| CliError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let locked = match access {
        Access::Read => FileExt::try_lock_shared(&file),
        Access::Write => FileExt::try_lock_exclusive(&file),
    };
    locked.map_err(|source| lock_error(path, source))?;

    tracing::debug!(path = %path.display(), ?access, "opened file");
    Ok(file)
}

/// Maps a failed lock attempt: contention becomes [`CliError::Locked`],
/// anything else keeps its I/O error.
fn lock_error(path: &Path, source: io::Error) -> CliError {
    if source.kind() == fs2::lock_contended_error().kind() {
        CliError::Locked {
            path: path.to_path_buf(),
        }
    } else {
        CliError::Lock {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolves an optional region length against the file size.
///
/// Without an explicit length the region runs to the end of the file.
pub fn region_length<S: LogSink>(
    io: &FileIo<S>,
    file: &File,
    offset: u64,
    length: Option<u64>,
) -> CliResult<u64> {
    if let Some(length) = length {
        return Ok(length);
    }
    let file_len = io.length(file)?;
    if offset > file_len {
        return Err(CliError::PastEnd {
            offset,
            length: file_len,
        });
    }
    Ok(file_len - offset)
}

/// Prints a report in the requested format.
pub fn emit<T: Serialize + Display>(format: OutputFormat, report: &T) -> CliResult<()> {
    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
