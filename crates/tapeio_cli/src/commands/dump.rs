//! Dump command implementation.

use super::{open_file, region_length, Access};
use crate::error::CliResult;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::Path;
use tapeio_fileio::{FileIo, LogSink, HARD_SANITY_LIMIT};

const BYTES_PER_LINE: usize = 16;

/// Raw contents of a region.
#[derive(Debug, Serialize)]
pub struct DumpReport {
    /// File path.
    pub path: String,
    /// Start of the region.
    pub offset: u64,
    /// Region bytes, hex encoded.
    pub hex: String,
    #[serde(skip)]
    bytes: Vec<u8>,
}

impl DumpReport {
    /// Returns the dumped bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for DumpReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.bytes.chunks(BYTES_PER_LINE).enumerate() {
            let address = self.offset + (i * BYTES_PER_LINE) as u64;
            write!(f, "{address:08x}  ")?;
            for slot in 0..BYTES_PER_LINE {
                match line.get(slot) {
                    Some(b) => write!(f, "{b:02x} ")?,
                    None => f.write_str("   ")?,
                }
            }
            let ascii: String = line
                .iter()
                .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                .collect();
            writeln!(f, " |{ascii}|")?;
        }
        Ok(())
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Runs the dump command.
pub fn run<S: LogSink>(
    io: &FileIo<S>,
    path: &Path,
    offset: u64,
    length: Option<u64>,
) -> CliResult<DumpReport> {
    let mut file = open_file(path, Access::Read)?;
    let length = region_length(io, &file, offset, length)?;

    // Oversized requests get an empty buffer; the read rejects them.
    let capacity = if length > HARD_SANITY_LIMIT {
        0
    } else {
        length as usize
    };
    let mut bytes = vec![0u8; capacity];
    io.seek(&mut file, offset)?;
    io.read(&mut file, &mut bytes, 0, length)?;

    Ok(DumpReport {
        path: path.display().to_string(),
        offset,
        hex: to_hex(&bytes),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dump_reads_region() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.dat");
        std::fs::write(&path, b"0123456789abcdef").unwrap();

        let report = run(&FileIo::new(), &path, 10, Some(4)).unwrap();
        assert_eq!(report.bytes(), b"abcd");
        assert_eq!(report.hex, "61626364");
    }

    #[test]
    fn dump_to_end_of_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.dat");
        std::fs::write(&path, b"0123456789abcdef").unwrap();

        let report = run(&FileIo::new(), &path, 12, None).unwrap();
        assert_eq!(report.bytes(), b"cdef");
    }

    #[test]
    fn dump_text_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.dat");
        std::fs::write(&path, b"AB\0").unwrap();

        let text = run(&FileIo::new(), &path, 0, None).unwrap().to_string();
        assert!(text.starts_with("00000000  41 42 00 "));
        assert!(text.trim_end().ends_with("|AB.|"));
    }

    #[test]
    fn dump_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.dat");
        std::fs::write(&path, b"short").unwrap();

        let err = run(&FileIo::new(), &path, 2, Some(10)).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
