//! Bounds-checked, durable operations over a borrowed file handle.

use crate::config::FileIoConfig;
use crate::error::{ErrorClass, FileIoError, FileIoResult};
use crate::handle::RandomAccessFile;
use crate::sink::{LogSink, Severity, TracingSink};
use crate::{HARD_SANITY_LIMIT, ZERO_CHUNK_SIZE};
use std::io::{self, SeekFrom};
use std::ops::Range;

/// Random-access file primitives.
///
/// `FileIo` holds configuration and a diagnostic sink, never a file. Each
/// operation borrows a handle for the duration of the call.
///
/// # Durability
///
/// `write`, `write_zeros`, `set_length` and `transfer_to` flush and sync
/// the handle before returning `Ok`. There is no buffering layer.
///
/// # Errors
///
/// Every operation returns a [`FileIoError`] whose [`ErrorClass`] separates
/// usage violations (fatal) from I/O failures (recoverable). A failure
/// part way through a write or transfer leaves the file partially modified.
///
/// # Example
///
/// ```rust
/// use tapeio_fileio::{FileIo, MemoryFile};
///
/// let io = FileIo::new();
/// let mut file = MemoryFile::new();
///
/// io.write(&mut file, b"hello world", 0, 11).unwrap();
/// io.seek(&mut file, 6).unwrap();
///
/// let mut buf = [0u8; 5];
/// io.read(&mut file, &mut buf, 0, 5).unwrap();
/// assert_eq!(&buf, b"world");
/// ```
#[derive(Debug, Clone)]
pub struct FileIo<S = TracingSink> {
    config: FileIoConfig,
    sink: S,
}

impl FileIo<TracingSink> {
    /// Creates an instance with default configuration, logging to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FileIoConfig::default())
    }

    /// Creates an instance with the given configuration, logging to `tracing`.
    #[must_use]
    pub fn with_config(config: FileIoConfig) -> Self {
        Self::with_sink(config, TracingSink)
    }
}

impl Default for FileIo<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LogSink> FileIo<S> {
    /// Creates an instance reporting diagnostics to `sink`.
    #[must_use]
    pub fn with_sink(config: FileIoConfig, sink: S) -> Self {
        Self { config, sink }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FileIoConfig {
        &self.config
    }

    /// Returns the diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Moves the cursor of `file` to `position`.
    ///
    /// # Errors
    ///
    /// - Fatal if `position` exceeds [`HARD_SANITY_LIMIT`]; no seek is issued
    /// - Recoverable if the underlying seek fails, leaving the cursor undefined
    pub fn seek<F>(&self, file: &mut F, position: u64) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        self.check_limit(handle, "seek position", position)?;

        file.seek(SeekFrom::Start(position)).map_err(|e| {
            self.report(
                handle,
                FileIoError::io("seek", e),
                &format!("setting file position to {position}"),
            )
        })?;
        Ok(())
    }

    /// Writes `buffer[buffer_offset..buffer_offset + length]` at the cursor
    /// and commits it to stable storage.
    ///
    /// # Errors
    ///
    /// - Fatal if `length` or `buffer_offset` exceeds [`HARD_SANITY_LIMIT`],
    ///   or the range lies outside `buffer`
    /// - Recoverable on a write error, a short write, or a failed sync
    pub fn write<F>(
        &self,
        file: &mut F,
        buffer: &[u8],
        buffer_offset: u64,
        length: u64,
    ) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        self.check_limit(handle, "write length", length)?;
        self.check_limit(handle, "write buffer offset", buffer_offset)?;
        let range = self.buffer_range(handle, buffer.len(), buffer_offset, length)?;

        write_fully(file, &buffer[range]).map_err(|e| self.report(handle, e, "writing data"))?;
        self.commit(file, handle)
    }

    /// Reads exactly `length` bytes at the cursor into
    /// `buffer[buffer_offset..]`.
    ///
    /// # Errors
    ///
    /// - Fatal if `length` or `buffer_offset` exceeds [`HARD_SANITY_LIMIT`],
    ///   or the range lies outside `buffer`
    /// - Recoverable on a read error or if the file ends early
    pub fn read<F>(
        &self,
        file: &mut F,
        buffer: &mut [u8],
        buffer_offset: u64,
        length: u64,
    ) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        self.check_limit(handle, "read length", length)?;
        self.check_limit(handle, "read buffer offset", buffer_offset)?;
        let range = self.buffer_range(handle, buffer.len(), buffer_offset, length)?;

        read_fully(file, &mut buffer[range]).map_err(|e| self.report(handle, e, "reading element"))
    }

    /// Returns the size of `file` from its metadata.
    ///
    /// # Errors
    ///
    /// Recoverable if the metadata query fails.
    pub fn length<F>(&self, file: &F) -> FileIoResult<u64>
    where
        F: RandomAccessFile + ?Sized,
    {
        file.metadata_len()
            .map_err(|e| self.report(file.handle_id(), FileIoError::Metadata(e), "getting file stat"))
    }

    /// Writes `length` zero bytes at the cursor, in four-byte chunks, and
    /// commits them to stable storage.
    ///
    /// # Errors
    ///
    /// - Fatal if `length` is not a multiple of four or exceeds
    ///   [`HARD_SANITY_LIMIT`]
    /// - Recoverable on a write error, a short write, or a failed sync
    pub fn write_zeros<F>(&self, file: &mut F, length: u64) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        if length % ZERO_CHUNK_SIZE != 0 {
            return Err(self.report(
                handle,
                FileIoError::Misaligned {
                    length,
                    alignment: ZERO_CHUNK_SIZE,
                },
                "zero fill",
            ));
        }
        self.check_limit(handle, "zero fill length", length)?;

        let chunk = [0u8; ZERO_CHUNK_SIZE as usize];
        for index in 0..length / ZERO_CHUNK_SIZE {
            write_fully(file, &chunk).map_err(|e| {
                self.report(
                    handle,
                    e,
                    &format!("writing zeros, chunk {index} of {length} bytes"),
                )
            })?;
        }
        self.commit(file, handle)
    }

    /// Truncates or extends `file` to exactly `length` bytes and syncs it.
    ///
    /// Bytes added by extension have unspecified content.
    ///
    /// # Errors
    ///
    /// - Fatal if `length` exceeds [`HARD_SANITY_LIMIT`]
    /// - Recoverable if the resize or the following sync fails
    pub fn set_length<F>(&self, file: &mut F, length: u64) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        self.check_limit(handle, "file size", length)?;

        file.resize(length).map_err(|e| {
            self.report(
                handle,
                FileIoError::io("set_len", e),
                &format!("setting file length to {length}"),
            )
        })?;
        self.commit(file, handle)
    }

    /// Copies `length` bytes from offset `source` to offset `destination`
    /// within `file`, then commits the result to stable storage.
    ///
    /// The caller is responsible for `source..source + length` holding valid
    /// data. A failure part way through leaves the destination partially
    /// written; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// - Fatal if any argument, or the end of either region, exceeds
    ///   [`HARD_SANITY_LIMIT`]
    /// - Recoverable if the regions overlap (no I/O is performed), or on a
    ///   seek error, short read, short write, or failed sync
    pub fn transfer_to<F>(
        &self,
        file: &mut F,
        source: u64,
        destination: u64,
        length: u64,
    ) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        let handle = file.handle_id();
        self.check_limit(handle, "transfer source", source)?;
        self.check_limit(handle, "transfer destination", destination)?;
        self.check_limit(handle, "transfer length", length)?;
        self.check_limit(handle, "transfer source end", source + length)?;
        self.check_limit(handle, "transfer destination end", destination + length)?;

        if regions_overlap(source, destination, length) {
            return Err(self.report(
                handle,
                FileIoError::Overlap {
                    src: source,
                    dest: destination,
                    len: length,
                },
                "can't transfer between overlapping parts of file",
            ));
        }

        let chunk_size = self.config.copy_buffer_size.max(1) as u64;
        let mut buffer = vec![0u8; chunk_size.min(length) as usize];
        let (mut src, mut dest, mut remaining) = (source, destination, length);

        while remaining > 0 {
            let chunk = remaining.min(chunk_size) as usize;

            self.seek(file, src)?;
            read_fully(file, &mut buffer[..chunk]).map_err(|e| {
                self.report(
                    handle,
                    e,
                    &format!("reading file, src={src} dest={dest} len={remaining} ({chunk})"),
                )
            })?;

            self.seek(file, dest)?;
            write_fully(file, &buffer[..chunk]).map_err(|e| {
                self.report(
                    handle,
                    e,
                    &format!("writing file, src={src} dest={dest} len={remaining} ({chunk})"),
                )
            })?;

            remaining -= chunk as u64;
            src += chunk as u64;
            dest += chunk as u64;
        }

        self.commit(file, handle)
    }

    /// Flushes and syncs `file`.
    fn commit<F>(&self, file: &mut F, handle: u64) -> FileIoResult<()>
    where
        F: RandomAccessFile + ?Sized,
    {
        file.flush()
            .and_then(|()| file.commit(self.config.sync_mode))
            .map_err(|e| self.report(handle, FileIoError::Sync(e), "flushing file"))
    }

    fn check_limit(&self, handle: u64, what: &'static str, value: u64) -> FileIoResult<()> {
        if value > HARD_SANITY_LIMIT {
            return Err(self.report(
                handle,
                FileIoError::SanityLimitExceeded {
                    what,
                    value,
                    limit: HARD_SANITY_LIMIT,
                },
                "rejected request",
            ));
        }
        Ok(())
    }

    /// Validates that `offset..offset + length` lies inside a buffer of
    /// `capacity` bytes.
    fn buffer_range(
        &self,
        handle: u64,
        capacity: usize,
        offset: u64,
        length: u64,
    ) -> FileIoResult<Range<usize>> {
        let range = usize::try_from(offset)
            .ok()
            .zip(usize::try_from(offset + length).ok())
            .filter(|&(_, end)| end <= capacity);

        match range {
            Some((start, end)) => Ok(start..end),
            None => Err(self.report(
                handle,
                FileIoError::BufferRange {
                    offset,
                    length,
                    capacity,
                },
                "rejected request",
            )),
        }
    }

    /// Sends `err` to the sink at the severity its class implies and hands
    /// it back for propagation.
    fn report(&self, handle: u64, err: FileIoError, context: &str) -> FileIoError {
        let severity = match err.class() {
            ErrorClass::Fatal => Severity::Fatal,
            ErrorClass::Recoverable => Severity::Warning,
        };
        self.sink
            .log(severity, handle, &format!("{context}: {err}, fhandle {handle}"));
        err
    }
}

/// Returns `true` if `[a, a + len)` and `[b, b + len)` share a byte.
fn regions_overlap(a: u64, b: u64, len: u64) -> bool {
    len > 0 && a < b + len && b < a + len
}

fn write_fully<F>(file: &mut F, mut buf: &[u8]) -> FileIoResult<()>
where
    F: RandomAccessFile + ?Sized,
{
    let expected = buf.len() as u64;
    while !buf.is_empty() {
        match file.write(buf) {
            Ok(0) => {
                return Err(FileIoError::ShortWrite {
                    expected,
                    actual: expected - buf.len() as u64,
                })
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(FileIoError::io("write", e)),
        }
    }
    Ok(())
}

fn read_fully<F>(file: &mut F, buf: &mut [u8]) -> FileIoResult<()>
where
    F: RandomAccessFile + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FileIoError::ShortRead {
                    expected: buf.len() as u64,
                    actual: filled as u64,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(FileIoError::io("read", e)),
        }
    }
    Ok(())
}
