//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zipsession::{ArchiveSession, CollectingSink, SessionOptions};

/// Creates a fresh temporary directory for one test.
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Creates an archive at `root/archive_name` holding `entries`.
///
/// Each entry's content is first written to a source file under
/// `root/sources/`, then added by name through a write session.
pub fn create_archive(
    root: &Path,
    archive_name: &str,
    password: Option<&str>,
    entries: &[(&str, &[u8])],
) -> PathBuf {
    create_archive_with_options(root, archive_name, password, SessionOptions::default(), entries)
}

/// Like [`create_archive`] with explicit session options.
pub fn create_archive_with_options(
    root: &Path,
    archive_name: &str,
    password: Option<&str>,
    options: SessionOptions,
    entries: &[(&str, &[u8])],
) -> PathBuf {
    let archive_path = root.join(archive_name);
    let mut session = ArchiveSession::with_options(options);
    match password {
        Some(password) => session
            .create_write_encrypted(&archive_path, password)
            .expect("Failed to create encrypted archive"),
        None => session
            .create_write(&archive_path)
            .expect("Failed to create archive"),
    }

    for (index, (name, content)) in entries.iter().enumerate() {
        let source = write_file(root, &format!("sources/{index}.bin"), content);
        session
            .add_entry(name, &source)
            .expect("Failed to add entry");
    }

    session.close().expect("Failed to close archive");
    archive_path
}

/// Opens `archive` and reads back every entry as `(name, data)`.
pub fn read_all(archive: &Path, password: Option<&str>) -> Vec<(String, Vec<u8>)> {
    let mut session = ArchiveSession::new();
    match password {
        Some(password) => session
            .open_read_encrypted(archive, password)
            .expect("Failed to open encrypted archive"),
        None => session.open_read(archive).expect("Failed to open archive"),
    }

    let count = session.count_entries().expect("Failed to count entries");
    let entries = (0..count)
        .map(|index| session.read_entry(index).expect("Failed to read entry"))
        .collect();
    session.close().expect("Failed to close archive");
    entries
}

/// Returns a session reporting into a fresh collecting sink.
pub fn recording_session() -> (ArchiveSession, CollectingSink) {
    let sink = CollectingSink::new();
    (ArchiveSession::with_sink(sink.clone()), sink)
}

/// Lists the names of the files directly inside `dir`.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.expect("Bad dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
