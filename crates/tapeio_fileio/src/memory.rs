//! In-memory file handle for testing.

use crate::config::SyncMode;
use crate::handle::RandomAccessFile;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Faults a [`MemoryFile`] can be told to produce.
///
/// All faults are off by default.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Total number of bytes writes will accept before returning `Ok(0)`.
    pub write_budget: Option<u64>,
    /// Make every seek fail.
    pub fail_seek: bool,
    /// Make every read fail.
    pub fail_read: bool,
    /// Make every sync fail.
    pub fail_sync: bool,
    /// Make metadata queries fail.
    pub fail_metadata: bool,
    /// Make resizes fail.
    pub fail_resize: bool,
}

/// An in-memory random-access file.
///
/// Behaves like a regular file opened for reading and writing: writes past
/// the end extend the file, seeking past the end is allowed, and reads at or
/// past the end return zero bytes. Faults can be injected to exercise the
/// error paths of [`crate::FileIo`].
///
/// # Example
///
/// ```rust
/// use tapeio_fileio::{FileIo, MemoryFile};
///
/// let io = FileIo::new();
/// let mut file = MemoryFile::new();
/// io.write(&mut file, b"tape", 0, 4).unwrap();
/// assert_eq!(file.data(), b"tape");
/// ```
#[derive(Debug, Default)]
pub struct MemoryFile {
    data: Vec<u8>,
    cursor: u64,
    id: u64,
    faults: Faults,
    seeks: usize,
    syncs: usize,
}

impl MemoryFile {
    /// Creates an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a file with pre-existing contents.
    ///
    /// Useful for testing recovery scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Sets the id reported by [`RandomAccessFile::handle_id`].
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Sets the faults to inject.
    #[must_use]
    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    /// Returns the injected faults for modification.
    pub fn faults_mut(&mut self) -> &mut Faults {
        &mut self.faults
    }

    /// Returns the file contents.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the file and returns its contents.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Returns how many seeks reached this file.
    #[must_use]
    pub fn seek_count(&self) -> usize {
        self.seeks
    }

    /// Returns how many successful syncs were performed.
    #[must_use]
    pub fn sync_count(&self) -> usize {
        self.syncs
    }
}

fn injected(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {what} failure"))
}

fn to_index(value: u64) -> io::Result<usize> {
    usize::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset exceeds address space"))
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.faults.fail_read {
            return Err(injected("read"));
        }
        let start = to_index(self.cursor)?;
        if start >= self.data.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.cursor += n as u64;
        Ok(n)
    }
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut n = buf.len();
        if let Some(budget) = self.faults.write_budget.as_mut() {
            n = n.min(usize::try_from(*budget).unwrap_or(usize::MAX));
            *budget -= n as u64;
        }
        if n == 0 {
            return Ok(0);
        }

        let start = to_index(self.cursor)?;
        let end = start + n;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(&buf[..n]);
        self.cursor += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seeks += 1;
        if self.faults.fail_seek {
            return Err(injected("seek"));
        }
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => (self.data.len() as u64).checked_add_signed(delta),
            SeekFrom::Current(delta) => self.cursor.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "invalid seek to a negative or overflowing position")
        })?;
        self.cursor = target;
        Ok(target)
    }
}

impl RandomAccessFile for MemoryFile {
    fn commit(&mut self, _mode: SyncMode) -> io::Result<()> {
        if self.faults.fail_sync {
            return Err(injected("sync"));
        }
        self.syncs += 1;
        Ok(())
    }

    fn metadata_len(&self) -> io::Result<u64> {
        if self.faults.fail_metadata {
            return Err(injected("metadata"));
        }
        Ok(self.data.len() as u64)
    }

    fn resize(&mut self, len: u64) -> io::Result<()> {
        if self.faults.fail_resize {
            return Err(injected("resize"));
        }
        self.data.resize(to_index(len)?, 0);
        Ok(())
    }

    fn handle_id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_write_extends_and_reads_back() {
        let mut file = MemoryFile::new();
        file.write_all(b"hello").unwrap();
        file.seek(SeekFrom::Start(1)).unwrap();

        let mut buf = [0u8; 3];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ell");
        assert_eq!(file.position(), 4);
    }

    #[test]
    fn memory_write_past_end_fills_gap() {
        let mut file = MemoryFile::new();
        file.seek(SeekFrom::Start(3)).unwrap();
        file.write_all(b"x").unwrap();

        assert_eq!(file.data(), &[0, 0, 0, b'x']);
    }

    #[test]
    fn memory_read_at_end_returns_zero() {
        let mut file = MemoryFile::with_data(b"ab".to_vec());
        file.seek(SeekFrom::End(0)).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(file.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_negative_seek_fails() {
        let mut file = MemoryFile::new();
        assert!(file.seek(SeekFrom::Current(-1)).is_err());
    }

    #[test]
    fn memory_write_budget_limits_bytes() {
        let mut file = MemoryFile::new().with_faults(Faults {
            write_budget: Some(3),
            ..Faults::default()
        });

        assert_eq!(file.write(b"hello").unwrap(), 3);
        assert_eq!(file.write(b"lo").unwrap(), 0);
        assert_eq!(file.data(), b"hel");
    }

    #[test]
    fn memory_injected_faults() {
        let mut file = MemoryFile::new().with_id(7);
        file.faults_mut().fail_sync = true;
        file.faults_mut().fail_metadata = true;
        file.faults_mut().fail_resize = true;

        assert!(file.commit(SyncMode::Full).is_err());
        assert!(file.metadata_len().is_err());
        assert!(file.resize(4).is_err());
        assert_eq!(file.handle_id(), 7);
        assert_eq!(file.sync_count(), 0);
    }

    #[test]
    fn memory_resize_truncates_and_extends() {
        let mut file = MemoryFile::with_data(b"hello".to_vec());
        file.resize(2).unwrap();
        assert_eq!(file.data(), b"he");

        file.resize(4).unwrap();
        assert_eq!(file.data(), &[b'h', b'e', 0, 0]);
    }
}
