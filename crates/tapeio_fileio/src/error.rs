//! Error types for file I/O operations.

use std::io;
use thiserror::Error;

/// Result type for file I/O operations.
pub type FileIoResult<T> = Result<T, FileIoError>;

/// How a caller is expected to treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A usage or precondition violation. Retrying the same call cannot
    /// succeed; the surrounding operation chain should be terminated.
    Fatal,
    /// An I/O or runtime condition the caller may retry or handle.
    Recoverable,
}

/// Errors that can occur during file I/O operations.
#[derive(Debug, Error)]
pub enum FileIoError {
    /// An offset or length argument exceeds the hard sanity limit.
    #[error("{what} {value} exceeds sanity hard limit {limit}")]
    SanityLimitExceeded {
        /// Which argument was rejected.
        what: &'static str,
        /// The rejected value.
        value: u64,
        /// The limit it was checked against.
        limit: u64,
    },

    /// A length argument violates an alignment precondition.
    #[error("length {length} must be a multiple of {alignment} bytes")]
    Misaligned {
        /// The rejected length.
        length: u64,
        /// The required alignment.
        alignment: u64,
    },

    /// The requested range does not lie inside the caller's buffer.
    #[error("buffer range offset {offset}, len {length} outside buffer of {capacity} bytes")]
    BufferRange {
        /// Offset into the buffer.
        offset: u64,
        /// Requested length.
        length: u64,
        /// Actual buffer size.
        capacity: usize,
    },

    /// An underlying I/O call failed.
    #[error("I/O error during {op}: {source}")]
    Io {
        /// The operation that failed.
        op: &'static str,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// End of file was reached before the requested bytes were read.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested.
        expected: u64,
        /// Bytes actually read.
        actual: u64,
    },

    /// The handle accepted fewer bytes than requested.
    #[error("short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite {
        /// Bytes requested.
        expected: u64,
        /// Bytes actually written.
        actual: u64,
    },

    /// Flushing or syncing to stable storage failed.
    #[error("durability commit failed: {0}")]
    Sync(#[source] io::Error),

    /// The file metadata could not be queried.
    #[error("metadata query failed: {0}")]
    Metadata(#[source] io::Error),

    /// Source and destination regions of a transfer overlap.
    #[error("overlapping transfer: src={src} dest={dest} len={len}")]
    Overlap {
        /// Source offset.
        src: u64,
        /// Destination offset.
        dest: u64,
        /// Transfer length.
        len: u64,
    },
}

impl FileIoError {
    /// Creates an I/O error tagged with the failing operation.
    pub(crate) fn io(op: &'static str, source: io::Error) -> Self {
        Self::Io { op, source }
    }

    /// Returns the class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::SanityLimitExceeded { .. } | Self::Misaligned { .. } | Self::BufferRange { .. } => {
                ErrorClass::Fatal
            }
            Self::Io { .. }
            | Self::ShortRead { .. }
            | Self::ShortWrite { .. }
            | Self::Sync(_)
            | Self::Metadata(_)
            | Self::Overlap { .. } => ErrorClass::Recoverable,
        }
    }

    /// Returns `true` for usage and precondition violations.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }

    /// Returns `true` for failures the caller may retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.class() == ErrorClass::Recoverable
    }
}
