//! CLI error type.

use std::io;
use std::path::PathBuf;
use tapeio_fileio::FileIoError;
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file operation failed.
    #[error(transparent)]
    FileIo(#[from] FileIoError),

    /// The file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Another process holds a conflicting lock on the file.
    #[error("{} is locked by another process", path.display())]
    Locked {
        /// Locked path.
        path: PathBuf,
    },

    /// Locking the file failed for a reason other than contention.
    #[error("cannot lock {}: {source}", path.display())]
    Lock {
        /// Path that failed to lock.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The requested region starts past the end of the file.
    #[error("offset {offset} is past the end of the file ({length} bytes)")]
    PastEnd {
        /// Requested offset.
        offset: u64,
        /// File length.
        length: u64,
    },

    /// JSON output could not be produced.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Usage violations caught by the file layer exit with 2, everything
    /// else with 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileIo(e) if e.is_fatal() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_file_errors_exit_with_two() {
        let err = CliError::from(FileIoError::Misaligned {
            length: 3,
            alignment: 4,
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = CliError::from(FileIoError::ShortRead {
            expected: 4,
            actual: 0,
        });
        assert_eq!(err.exit_code(), 1);

        let err = CliError::Locked {
            path: PathBuf::from("queue.dat"),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "queue.dat is locked by another process");
    }
}
