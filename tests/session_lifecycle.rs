//! Session state machine tests.
//!
//! These cover the open/closed lifecycle, mode restrictions, exclusive
//! creation, and the guarantee that failed operations leave the session
//! usable.

mod common;

use std::fs;

use zipsession::{ArchiveSession, CodecCode, ErrorKind, SessionMode};

// =============================================================================
// Closed-state preconditions
// =============================================================================

#[test]
fn test_entry_operations_on_closed_session_fail_with_not_open() {
    let dir = common::temp_dir();
    let source = common::write_file(dir.path(), "a.txt", b"content");
    let (mut session, sink) = common::recording_session();

    assert_eq!(session.count_entries().unwrap_err().kind(), ErrorKind::NotOpen);
    assert_eq!(session.stat_entry(0).unwrap_err().kind(), ErrorKind::NotOpen);
    assert_eq!(session.read_entry(0).unwrap_err().kind(), ErrorKind::NotOpen);
    assert_eq!(
        session.extract_entry(0, dir.path()).unwrap_err().kind(),
        ErrorKind::NotOpen
    );
    assert_eq!(
        session.add_entry("a.txt", &source).unwrap_err().kind(),
        ErrorKind::NotOpen
    );
    assert_eq!(session.entries().unwrap_err().kind(), ErrorKind::NotOpen);

    let operations: Vec<String> = sink.reports().into_iter().map(|r| r.operation).collect();
    assert_eq!(
        operations,
        [
            "count_entries",
            "stat_entry",
            "read_entry",
            "extract_entry",
            "add_entry",
            "entries"
        ]
    );
}

#[test]
fn test_close_twice_is_noop() {
    let dir = common::temp_dir();
    let (mut session, sink) = common::recording_session();
    session.create_write(dir.path().join("a.zip")).unwrap();

    assert!(session.close().is_ok());
    assert!(!session.is_open());
    assert!(session.close().is_ok());
    assert!(sink.is_empty());
}

#[test]
fn test_close_wipes_password() {
    let dir = common::temp_dir();
    let mut session = ArchiveSession::new();
    session
        .create_write_encrypted(dir.path().join("a.zip"), "secret")
        .unwrap();
    assert!(session.is_encrypted());

    session.close().unwrap();
    assert!(!session.is_encrypted());
}

#[test]
fn test_empty_password_is_unencrypted() {
    let dir = common::temp_dir();
    let mut session = ArchiveSession::new();
    session
        .create_write_encrypted(dir.path().join("a.zip"), "")
        .unwrap();
    assert!(!session.is_encrypted());
    session.close().unwrap();
}

// =============================================================================
// Open / create
// =============================================================================

#[test]
fn test_open_missing_archive_fails() {
    let dir = common::temp_dir();
    let (mut session, sink) = common::recording_session();

    let err = session.open_read(dir.path().join("missing.zip")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert_eq!(err.codec_failure().map(|f| f.code), Some(CodecCode::NoEntry));
    assert!(!session.is_open());

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].operation, "open_read");
    assert!(reports[0].failure.is_some());
}

#[test]
fn test_open_corrupt_archive_fails() {
    let dir = common::temp_dir();
    let path = common::write_file(dir.path(), "bogus.zip", b"this is not a zip archive at all");
    let mut session = ArchiveSession::new();

    let err = session.open_read(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(!session.is_open());
}

#[test]
fn test_failed_encrypted_open_does_not_keep_password() {
    let dir = common::temp_dir();
    let mut session = ArchiveSession::new();

    assert!(
        session
            .open_read_encrypted(dir.path().join("missing.zip"), "secret")
            .is_err()
    );
    assert!(!session.is_encrypted());
}

#[test]
fn test_create_is_exclusive() {
    let dir = common::temp_dir();
    let existing = common::write_file(dir.path(), "existing.zip", b"keep me");
    let mut session = ArchiveSession::new();

    let err = session.create_write(&existing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Create);
    assert_eq!(err.codec_failure().map(|f| f.code), Some(CodecCode::Exists));
    assert_eq!(fs::read(&existing).unwrap(), b"keep me");
}

#[test]
fn test_create_in_missing_directory_fails() {
    let dir = common::temp_dir();
    let mut session = ArchiveSession::new();

    let err = session
        .create_write(dir.path().join("no/such/dir/a.zip"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Create);
    assert!(!session.is_open());
}

#[test]
fn test_open_while_open_fails() {
    let dir = common::temp_dir();
    let archive = common::create_archive(dir.path(), "a.zip", None, &[("a.txt", b"a")]);
    let mut session = ArchiveSession::new();
    session.open_read(&archive).unwrap();

    let err = session.create_write(dir.path().join("b.zip")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyOpen);
    assert!(!dir.path().join("b.zip").exists());

    // The first archive is still usable
    assert_eq!(session.mode(), Some(SessionMode::Read));
    assert_eq!(session.count_entries().unwrap(), 1);
    assert_eq!(session.path(), Some(archive.as_path()));
}

// =============================================================================
// Mode restrictions
// =============================================================================

#[test]
fn test_add_on_read_session_fails_with_wrong_mode() {
    let dir = common::temp_dir();
    let archive = common::create_archive(dir.path(), "a.zip", None, &[("a.txt", b"a")]);
    let source = common::write_file(dir.path(), "b.txt", b"b");
    let mut session = ArchiveSession::new();
    session.open_read(&archive).unwrap();

    let err = session.add_entry("b.txt", &source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongMode);
}

#[test]
fn test_read_on_write_session_fails_with_wrong_mode() {
    let dir = common::temp_dir();
    let source = common::write_file(dir.path(), "a.txt", b"a");
    let mut session = ArchiveSession::new();
    session.create_write(dir.path().join("a.zip")).unwrap();
    session.add_entry("a.txt", &source).unwrap();

    assert_eq!(session.read_entry(0).unwrap_err().kind(), ErrorKind::WrongMode);
    assert_eq!(session.stat_entry(0).unwrap_err().kind(), ErrorKind::WrongMode);
    // Counting works in both modes
    assert_eq!(session.count_entries().unwrap(), 1);
    session.close().unwrap();
}

// =============================================================================
// Adding entries
// =============================================================================

#[test]
fn test_add_missing_source_keeps_session_usable() {
    let dir = common::temp_dir();
    let archive = dir.path().join("a.zip");
    let source = common::write_file(dir.path(), "real.txt", b"real content");
    let (mut session, sink) = common::recording_session();
    session.create_write(&archive).unwrap();

    let err = session
        .add_entry("ghost.txt", dir.path().join("ghost.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Add);
    assert!(session.is_open());

    session.add_entry("real.txt", &source).unwrap();
    session.close().unwrap();
    assert_eq!(sink.len(), 1);

    let entries = common::read_all(&archive, None);
    assert_eq!(entries, vec![("real.txt".to_string(), b"real content".to_vec())]);
}

#[test]
fn test_add_directory_as_source_fails() {
    let dir = common::temp_dir();
    let mut session = ArchiveSession::new();
    session.create_write(dir.path().join("a.zip")).unwrap();

    let err = session.add_entry("dir", dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Add);
    // Directories can be opened for reading on Unix, so the type check rejects them
    #[cfg(unix)]
    assert_eq!(
        err.codec_failure().map(|f| f.code),
        Some(CodecCode::InvalidArgument)
    );
    assert_eq!(session.count_entries().unwrap(), 0);
    session.close().unwrap();
}

#[test]
fn test_duplicate_entry_name() {
    let dir = common::temp_dir();
    let archive = dir.path().join("a.zip");
    let first = common::write_file(dir.path(), "first.txt", b"first");
    let second = common::write_file(dir.path(), "second.txt", b"second");
    let mut session = ArchiveSession::new();
    session.create_write(&archive).unwrap();

    session.add_entry("same.txt", &first).unwrap();
    let err = session.add_entry("same.txt", &second).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(session.count_entries().unwrap(), 1);
    session.close().unwrap();

    let entries = common::read_all(&archive, None);
    assert_eq!(entries, vec![("same.txt".to_string(), b"first".to_vec())]);
}

#[test]
fn test_write_session_entries_track_additions() {
    let dir = common::temp_dir();
    let a = common::write_file(dir.path(), "a.txt", b"aaaa");
    let b = common::write_file(dir.path(), "b.txt", b"bb");
    let mut session = ArchiveSession::new();
    session
        .create_write_encrypted(dir.path().join("a.zip"), "pw")
        .unwrap();
    session.add_entry("a.txt", &a).unwrap();
    session.add_entry("nested/b.txt", &b).unwrap();

    let entries = session.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].index, 0);
    assert_eq!(entries[0].size, 4);
    assert_eq!(entries[1].name, "nested/b.txt");
    assert!(entries.iter().all(|e| e.encrypted));
    session.close().unwrap();
}

// =============================================================================
// Index handling
// =============================================================================

#[test]
fn test_out_of_range_index_writes_nothing() {
    let dir = common::temp_dir();
    let archive = common::create_archive(dir.path(), "a.zip", None, &[("a.txt", b"a")]);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let mut session = ArchiveSession::new();
    session.open_read(&archive).unwrap();
    let count = session.count_entries().unwrap();

    assert_eq!(session.stat_entry(count).unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(session.read_entry(count).unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(
        session.extract_entry(count, &out).unwrap_err().kind(),
        ErrorKind::Index
    );
    assert_eq!(session.read_entry(-1).unwrap_err().kind(), ErrorKind::Index);
    assert!(common::dir_listing(&out).is_empty());
}

#[test]
fn test_stat_entry_reports_metadata() {
    let dir = common::temp_dir();
    let archive = common::create_archive(
        dir.path(),
        "a.zip",
        None,
        &[("a.txt", b"12345"), ("sub/b.txt", b"")],
    );
    let mut session = ArchiveSession::new();
    session.open_read(&archive).unwrap();

    let stat = session.stat_entry(0).unwrap();
    assert_eq!(stat.index, 0);
    assert_eq!(stat.name, "a.txt");
    assert_eq!(stat.size, 5);
    assert!(!stat.encrypted);

    let stat = session.stat_entry(1).unwrap();
    assert_eq!(stat.name, "sub/b.txt");
    assert_eq!(stat.size, 0);
}

// =============================================================================
// Drop
// =============================================================================

#[test]
fn test_drop_finalizes_write_session() {
    let dir = common::temp_dir();
    let archive = dir.path().join("a.zip");
    let source = common::write_file(dir.path(), "a.txt", b"dropped but kept");
    {
        let mut session = ArchiveSession::new();
        session.create_write(&archive).unwrap();
        session.add_entry("a.txt", &source).unwrap();
    }

    let entries = common::read_all(&archive, None);
    assert_eq!(entries, vec![("a.txt".to_string(), b"dropped but kept".to_vec())]);
}

#[test]
fn test_session_reusable_after_close() {
    let dir = common::temp_dir();
    let source = common::write_file(dir.path(), "a.txt", b"a");
    let mut session = ArchiveSession::new();

    session.create_write(dir.path().join("one.zip")).unwrap();
    session.add_entry("a.txt", &source).unwrap();
    session.close().unwrap();

    session.open_read(dir.path().join("one.zip")).unwrap();
    assert_eq!(session.count_entries().unwrap(), 1);
    session.close().unwrap();

    session.create_write(dir.path().join("two.zip")).unwrap();
    assert_eq!(session.count_entries().unwrap(), 0);
    session.close().unwrap();
}
