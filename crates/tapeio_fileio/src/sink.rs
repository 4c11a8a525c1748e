//! Diagnostic sinks.
//!
//! Every failing operation reports one diagnostic before returning its
//! error. Usage violations are reported at [`Severity::Fatal`], recoverable
//! I/O failures at [`Severity::Warning`].

use parking_lot::Mutex;
use std::sync::Arc;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Usage or precondition violation.
    Fatal,
    /// Recoverable I/O failure.
    Warning,
}

/// Receives diagnostics emitted by [`crate::FileIo`].
pub trait LogSink: Send + Sync {
    /// Records a diagnostic about the handle identified by `handle`.
    fn log(&self, severity: Severity, handle: u64, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn log(&self, severity: Severity, handle: u64, message: &str) {
        (**self).log(severity, handle, message);
    }
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn log(&self, severity: Severity, handle: u64, message: &str) {
        (**self).log(severity, handle, message);
    }
}

/// Forwards diagnostics to `tracing`.
///
/// Fatal diagnostics are emitted at `ERROR`, warnings at `WARN`, both with
/// the handle id as a structured field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, handle: u64, message: &str) {
        match severity {
            Severity::Fatal => tracing::error!(fhandle = handle, "{message}"),
            Severity::Warning => tracing::warn!(fhandle = handle, "{message}"),
        }
    }
}

/// A diagnostic recorded by [`CapturingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Handle id the diagnostic refers to.
    pub handle: u64,
    /// Rendered message.
    pub message: String,
}

/// A sink that keeps every diagnostic in memory.
///
/// Useful for asserting on emitted diagnostics in tests.
///
/// # Example
///
/// ```rust
/// use tapeio_fileio::{CapturingSink, FileIo, FileIoConfig, MemoryFile, Severity};
///
/// let sink = CapturingSink::new();
/// let io = FileIo::with_sink(FileIoConfig::default(), &sink);
/// let mut file = MemoryFile::new();
///
/// assert!(io.seek(&mut file, u64::MAX).is_err());
/// assert_eq!(sink.diagnostics()[0].severity, Severity::Fatal);
/// ```
#[derive(Debug, Default)]
pub struct CapturingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CapturingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Removes and returns all recorded diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl LogSink for CapturingSink {
    fn log(&self, severity: Severity, handle: u64, message: &str) {
        self.entries.lock().push(Diagnostic {
            severity,
            handle,
            message: message.to_owned(),
        });
    }
}
