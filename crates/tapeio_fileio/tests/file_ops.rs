//! Operations against real files.

use proptest::prelude::*;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tapeio_fileio::{
    CapturingSink, FileIo, FileIoConfig, FileIoError, MemoryFile, Severity, SyncMode,
    HARD_SANITY_LIMIT,
};
use tempfile::tempdir;

fn open(path: &Path) -> File {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .unwrap()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

#[test]
fn write_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.dat");
    let io = FileIo::new();

    {
        let mut file = open(&path);
        io.write_zeros(&mut file, 16).unwrap();
        io.seek(&mut file, 4).unwrap();
        io.write(&mut file, b"durable!", 0, 8).unwrap();
    }

    let mut file = open(&path);
    assert_eq!(io.length(&file).unwrap(), 16);

    io.seek(&mut file, 4).unwrap();
    let mut buf = [0u8; 8];
    io.read(&mut file, &mut buf, 0, 8).unwrap();
    assert_eq!(&buf, b"durable!");
}

#[test]
fn write_zeros_regression_eight_bytes() {
    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("zeros.dat"));
    let io = FileIo::new();

    io.write_zeros(&mut file, 8).unwrap();
    assert_eq!(io.length(&file).unwrap(), 8);

    io.seek(&mut file, 0).unwrap();
    let mut buf = [0xffu8; 8];
    io.read(&mut file, &mut buf, 0, 8).unwrap();
    assert_eq!(buf, [0u8; 8]);
}

#[test]
fn set_length_truncates_real_file() {
    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("trunc.dat"));
    let io = FileIo::new();

    io.write(&mut file, &pattern(64), 0, 64).unwrap();
    io.set_length(&mut file, 24).unwrap();
    assert_eq!(io.length(&file).unwrap(), 24);

    io.seek(&mut file, 20).unwrap();
    let mut buf = [0u8; 8];
    let err = io.read(&mut file, &mut buf, 0, 8).unwrap_err();
    assert!(matches!(err, FileIoError::ShortRead { actual: 4, .. }));
}

#[test]
fn transfer_relocates_hundred_bytes() {
    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("move.dat"));
    let io = FileIo::new();
    let data = pattern(100);

    io.write(&mut file, &data, 0, 100).unwrap();
    io.transfer_to(&mut file, 0, 200, 100).unwrap();
    assert_eq!(io.length(&file).unwrap(), 300);

    io.seek(&mut file, 200).unwrap();
    let mut buf = vec![0u8; 100];
    io.read(&mut file, &mut buf, 0, 100).unwrap();
    assert_eq!(buf, data);
}

#[test]
fn transfer_overlap_leaves_file_unmodified() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overlap.dat");
    let mut file = open(&path);
    let sink = CapturingSink::new();
    let io = FileIo::with_sink(FileIoConfig::default(), &sink);
    let data = pattern(32);

    io.write(&mut file, &data, 0, 32).unwrap();
    let err = io.transfer_to(&mut file, 0, 2, 10).unwrap_err();
    assert!(err.is_recoverable());

    drop(file);
    assert_eq!(std::fs::read(&path).unwrap(), data);

    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn transfer_large_region_with_data_sync() {
    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("large.dat"));
    let io = FileIo::with_config(FileIoConfig::new().sync_mode(SyncMode::Data));
    let data = pattern(10_000);

    io.write(&mut file, &data, 0, 10_000).unwrap();
    io.transfer_to(&mut file, 0, 12_000, 10_000).unwrap();

    io.seek(&mut file, 12_000).unwrap();
    let mut buf = vec![0u8; 10_000];
    io.read(&mut file, &mut buf, 0, 10_000).unwrap();
    assert_eq!(buf, data);
}

#[test]
fn seek_past_limit_rejected_on_real_file() {
    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("limit.dat"));
    let io = FileIo::new();

    let err = io.seek(&mut file, HARD_SANITY_LIMIT + 1).unwrap_err();
    assert!(err.is_fatal());
}

#[cfg(unix)]
#[test]
fn diagnostics_carry_descriptor() {
    use std::os::unix::io::AsRawFd;

    let dir = tempdir().unwrap();
    let mut file = open(&dir.path().join("fd.dat"));
    let sink = CapturingSink::new();
    let io = FileIo::with_sink(FileIoConfig::default(), &sink);

    let mut buf = [0u8; 4];
    assert!(io.read(&mut file, &mut buf, 0, 4).is_err());
    assert_eq!(sink.diagnostics()[0].handle, file.as_raw_fd() as u64);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_at_any_position(
        position in 0u64..4096,
        data in proptest::collection::vec(any::<u8>(), 1..512),
    ) {
        let io = FileIo::new();
        let mut file = MemoryFile::new();
        let len = data.len() as u64;

        io.seek(&mut file, position).unwrap();
        io.write(&mut file, &data, 0, len).unwrap();

        io.seek(&mut file, position).unwrap();
        let mut buf = vec![0u8; data.len()];
        io.read(&mut file, &mut buf, 0, len).unwrap();
        prop_assert_eq!(buf, data);
    }

    #[test]
    fn read_succeeds_iff_file_long_enough(
        file_len in 0usize..256,
        position in 0u64..300,
        len in 1u64..64,
    ) {
        let io = FileIo::new();
        let mut file = MemoryFile::with_data(pattern(file_len));
        let mut buf = vec![0u8; len as usize];

        io.seek(&mut file, position).unwrap();
        let result = io.read(&mut file, &mut buf, 0, len);
        prop_assert_eq!(result.is_ok(), position + len <= file_len as u64);
    }

    #[test]
    fn transfer_copies_disjoint_regions(
        source in 0u64..512,
        destination in 0u64..512,
        len in 0u64..128,
        chunk in 1usize..64,
    ) {
        let io = FileIo::with_config(FileIoConfig::new().copy_buffer_size(chunk));
        let data = pattern(1024);
        let mut file = MemoryFile::with_data(data.clone());
        let overlapping = len > 0 && source < destination + len && destination < source + len;

        let result = io.transfer_to(&mut file, source, destination, len);
        if overlapping {
            let rejected = matches!(result, Err(FileIoError::Overlap { .. }));
            prop_assert!(rejected, "overlapping transfer was not rejected");
            prop_assert_eq!(file.data(), data.as_slice());
        } else {
            prop_assert!(result.is_ok());
            let (s, d, l) = (source as usize, destination as usize, len as usize);
            prop_assert_eq!(&file.data()[d..d + l], &data[s..s + l]);
        }
    }

    #[test]
    fn write_zeros_length_is_exact(words in 0u64..256) {
        let io = FileIo::new();
        let mut file = MemoryFile::new();

        io.write_zeros(&mut file, words * 4).unwrap();
        prop_assert_eq!(io.length(&file).unwrap(), words * 4);
        prop_assert!(file.data().iter().all(|&b| b == 0));
    }
}
