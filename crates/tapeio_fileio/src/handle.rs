//! The file handle abstraction the operations borrow.

use crate::config::SyncMode;
use std::fs::File;
use std::io::{self, Read, Seek, Write};

/// An open, seekable file handle.
///
/// The operations in [`crate::FileIo`] borrow a handle for the duration of a
/// single call and never retain it. Opening, locking and closing the
/// underlying file is the caller's responsibility.
///
/// # Implementors
///
/// - [`std::fs::File`] - For persistent storage
/// - [`crate::MemoryFile`] - For testing, with fault injection
pub trait RandomAccessFile: Read + Write + Seek {
    /// Forces written data to stable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    fn commit(&mut self, mode: SyncMode) -> io::Result<()>;

    /// Returns the current size of the file from its metadata.
    ///
    /// This must not move the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be queried.
    fn metadata_len(&self) -> io::Result<u64>;

    /// Truncates or extends the file to exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the resize fails.
    fn resize(&mut self, len: u64) -> io::Result<()>;

    /// Numeric identifier used in diagnostics (the raw descriptor on Unix).
    fn handle_id(&self) -> u64;
}

impl RandomAccessFile for File {
    fn commit(&mut self, mode: SyncMode) -> io::Result<()> {
        match mode {
            SyncMode::Full => self.sync_all(),
            SyncMode::Data => self.sync_data(),
        }
    }

    fn metadata_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn resize(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn handle_id(&self) -> u64 {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            self.as_raw_fd() as u64
        }

        #[cfg(windows)]
        {
            use std::os::windows::io::AsRawHandle;
            self.as_raw_handle() as usize as u64
        }

        #[cfg(not(any(unix, windows)))]
        {
            0
        }
    }
}
