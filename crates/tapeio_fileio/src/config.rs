//! File I/O configuration.

use crate::COPY_BUFFER_SIZE;

/// How a durability commit reaches stable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Sync data and metadata (`File::sync_all`).
    #[default]
    Full,
    /// Sync data only (`File::sync_data`). File size changes are still
    /// persisted, other metadata such as timestamps may not be.
    Data,
}

/// Configuration for [`crate::FileIo`].
#[derive(Debug, Clone)]
pub struct FileIoConfig {
    /// Chunk size used by `transfer_to`. Any value of at least one byte is
    /// correct; larger chunks need fewer syscalls.
    pub copy_buffer_size: usize,

    /// How durability commits are performed.
    pub sync_mode: SyncMode,
}

impl Default for FileIoConfig {
    fn default() -> Self {
        Self {
            copy_buffer_size: COPY_BUFFER_SIZE,
            sync_mode: SyncMode::Full,
        }
    }
}

impl FileIoConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transfer chunk size. Zero is clamped to one byte.
    #[must_use]
    pub const fn copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets the sync mode.
    #[must_use]
    pub const fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }
}
