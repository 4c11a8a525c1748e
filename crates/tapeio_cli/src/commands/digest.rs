//! Digest command implementation.

use super::{open_file, region_length, Access};
use crate::error::CliResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink};

/// Bytes hashed per read.
const READ_CHUNK: u64 = 64 * 1024;

/// SHA-256 of a region.
#[derive(Debug, Serialize)]
pub struct DigestReport {
    /// File path.
    pub path: String,
    /// Start of the region.
    pub offset: u64,
    /// Region length.
    pub length: u64,
    /// Lowercase hex SHA-256.
    pub sha256: String,
}

impl fmt::Display for DigestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}[{}..{}]",
            self.sha256,
            self.path,
            self.offset,
            self.offset + self.length
        )
    }
}

/// Runs the digest command.
///
/// Comparing the digests of a source and destination region is a quick way
/// to confirm a `copy`.
pub fn run<S: LogSink>(
    io: &FileIo<S>,
    path: &Path,
    offset: u64,
    length: Option<u64>,
) -> CliResult<DigestReport> {
    let mut file = open_file(path, Access::Read)?;
    let length = region_length(io, &file, offset, length)?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK.min(length) as usize];
    let mut remaining = length;

    io.seek(&mut file, offset)?;
    while remaining > 0 {
        let chunk = remaining.min(READ_CHUNK);
        io.read(&mut file, &mut buf, 0, chunk)?;
        hasher.update(&buf[..chunk as usize]);
        remaining -= chunk;
    }

    Ok(DigestReport {
        path: path.display().to_string(),
        offset,
        length,
        sha256: format!("{:x}", hasher.finalize()),
    })
}
