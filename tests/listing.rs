//! Directory listing tests.

mod common;

use std::fs;

use zipsession::{ArchiveSession, CollectingSink, ErrorKind, list_relative_files_with_sink};

fn sample_tree() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = common::temp_dir();
    let root = dir.path().join("D");
    common::write_file(&root, "a.txt", b"a");
    common::write_file(&root, "sub/b.txt", b"b");
    common::write_file(&root, "sub/deeper/c.txt", b"c");
    fs::create_dir_all(root.join("empty")).unwrap();
    (dir, root)
}

#[test]
fn test_listing_relative_to_directory() {
    let (_dir, root) = sample_tree();
    let files = zipsession::list_relative_files(&root, true).unwrap();
    assert_eq!(files, ["a.txt", "sub/b.txt", "sub/deeper/c.txt"]);
}

#[test]
fn test_listing_keeps_leaf_directory_name() {
    let (_dir, root) = sample_tree();
    let files = zipsession::list_relative_files(&root, false).unwrap();
    assert_eq!(files, ["D/a.txt", "D/sub/b.txt", "D/sub/deeper/c.txt"]);
}

#[test]
fn test_listing_flags_differ_only_by_leaf_prefix() {
    let (_dir, root) = sample_tree();
    let without = ArchiveSession::list_relative_files(&root, true).unwrap();
    let with = ArchiveSession::list_relative_files(&root, false).unwrap();

    let stripped: Vec<&str> = with
        .iter()
        .map(|p| p.strip_prefix("D/").unwrap())
        .collect();
    assert_eq!(stripped, without);
}

#[test]
fn test_listing_trailing_separator() {
    let (_dir, root) = sample_tree();
    let with_slash = format!("{}/", root.display());
    assert_eq!(
        zipsession::list_relative_files(&with_slash, false).unwrap(),
        zipsession::list_relative_files(&root, false).unwrap()
    );
}

#[test]
fn test_listing_is_sorted() {
    let dir = common::temp_dir();
    for name in ["zeta.txt", "alpha.txt", "mid/x.txt", "Beta.txt"] {
        common::write_file(dir.path(), name, b"");
    }
    let files = zipsession::list_relative_files(dir.path(), true).unwrap();
    assert_eq!(files, ["Beta.txt", "alpha.txt", "mid/x.txt", "zeta.txt"]);
}

#[test]
fn test_listing_empty_directory() {
    let dir = common::temp_dir();
    assert!(zipsession::list_relative_files(dir.path(), true).unwrap().is_empty());
}

#[test]
fn test_listing_missing_directory_reports_failure() {
    let dir = common::temp_dir();
    let sink = CollectingSink::new();

    let err = list_relative_files_with_sink(dir.path().join("nope"), true, &sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].operation, "list_relative_files");
}

#[test]
fn test_listing_file_instead_of_directory() {
    let dir = common::temp_dir();
    let file = common::write_file(dir.path(), "plain.txt", b"x");
    let err = zipsession::list_relative_files(&file, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);
}

#[cfg(unix)]
#[test]
fn test_listing_follows_file_symlinks_only() {
    let (_dir, root) = sample_tree();
    std::os::unix::fs::symlink(root.join("a.txt"), root.join("link.txt")).unwrap();
    std::os::unix::fs::symlink(root.join("sub"), root.join("linked_dir")).unwrap();

    let files = zipsession::list_relative_files(&root, true).unwrap();
    assert_eq!(files, ["a.txt", "link.txt", "sub/b.txt", "sub/deeper/c.txt"]);
}
