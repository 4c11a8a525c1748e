//! Shared helpers for tapeio benchmarks.

use rand::Rng;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Generates random bytes of the given size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Opens a benchmark file for reading and writing, creating it if needed.
pub fn open_rw(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}
