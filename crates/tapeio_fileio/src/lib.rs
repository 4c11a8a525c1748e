//! # tapeio fileio
//!
//! Random-access file primitives for tapeio.
//!
//! This crate is the only layer of tapeio that touches on-disk byte layout.
//! It offers bounds-checked seek, read, write, zero-fill, length query,
//! resize and intra-file copy over a borrowed file handle. Higher-level
//! formats (headers, records, wraparound queues) are built on top and own
//! all interpretation of the bytes.
//!
//! ## Design Principles
//!
//! - Handles are borrowed per call, never opened, retained or closed here
//! - Every mutating operation is durable (flushed and synced) when it
//!   returns `Ok`
//! - Arguments above [`HARD_SANITY_LIMIT`] are rejected before any I/O
//! - Errors are classified as fatal (usage) or recoverable (I/O)
//! - Diagnostics go to an injected [`LogSink`]
//!
//! ## Example
//!
//! ```rust
//! use tapeio_fileio::{FileIo, MemoryFile};
//!
//! let io = FileIo::new();
//! let mut file = MemoryFile::new();
//!
//! io.write(&mut file, b"hello world", 0, 11).unwrap();
//! io.transfer_to(&mut file, 0, 16, 11).unwrap();
//!
//! io.seek(&mut file, 16).unwrap();
//! let mut buf = [0u8; 11];
//! io.read(&mut file, &mut buf, 0, 11).unwrap();
//! assert_eq!(&buf, b"hello world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handle;
mod memory;
mod ops;
mod sink;

pub use config::{FileIoConfig, SyncMode};
pub use error::{ErrorClass, FileIoError, FileIoResult};
pub use handle::RandomAccessFile;
pub use memory::{Faults, MemoryFile};
pub use ops::FileIo;
pub use sink::{CapturingSink, Diagnostic, LogSink, Severity, TracingSink};

/// Largest offset or length any operation accepts (2 GiB).
pub const HARD_SANITY_LIMIT: u64 = 1 << 31;

/// Default chunk size for [`FileIo::transfer_to`].
pub const COPY_BUFFER_SIZE: usize = 4096;

/// Size of each chunk written by [`FileIo::write_zeros`]; lengths must be a
/// multiple of it.
pub const ZERO_CHUNK_SIZE: u64 = 4;
