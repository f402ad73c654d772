//! Relative file listing for building archives from directories.
//!
//! [`list_relative_files`] walks a directory tree and returns every regular
//! file as a `/`-separated path suitable for use as an entry name.
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, list_relative_files};
//!
//! # fn main() -> zipsession::Result<()> {
//! let mut session = ArchiveSession::new();
//! session.create_write("assets.zip")?;
//! for name in list_relative_files("assets", true)? {
//!     session.add_entry(&name, format!("assets/{name}"))?;
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::{Error, Result};

/// Lists all regular files under `directory`, relative to a base.
///
/// With `exclude_leaf_dir_name` set, paths are relative to `directory`
/// itself (`sub/x.txt`). Without it, they are relative to the parent of
/// `directory`, so the directory's own name becomes the first component
/// (`D/sub/x.txt`).
///
/// Directories are not listed. Symbolic links to files are listed; symbolic
/// links to directories are not followed. The result is sorted
/// lexicographically and always uses `/` as separator, independent of the
/// platform's traversal order.
///
/// Failures are reported to [`LogSink`]; use
/// [`list_relative_files_with_sink`] to choose the sink.
///
/// # Errors
///
/// Returns [`Error::DirectoryNotFound`] if `directory` is not an existing
/// directory, or [`Error::Io`] if walking it fails.
pub fn list_relative_files(
    directory: impl AsRef<Path>,
    exclude_leaf_dir_name: bool,
) -> Result<Vec<String>> {
    list_relative_files_with_sink(directory, exclude_leaf_dir_name, &LogSink)
}

/// Like [`list_relative_files`], reporting failures to `sink`.
pub fn list_relative_files_with_sink(
    directory: impl AsRef<Path>,
    exclude_leaf_dir_name: bool,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<String>> {
    let result = collect_relative_files(directory.as_ref(), exclude_leaf_dir_name);
    if let Err(e) = &result {
        sink.on_failure("list_relative_files", e);
    }
    result
}

fn collect_relative_files(directory: &Path, exclude_leaf_dir_name: bool) -> Result<Vec<String>> {
    let directory = normalize_directory(directory);
    if !directory.is_dir() {
        return Err(Error::DirectoryNotFound { path: directory });
    }

    let prefix = if exclude_leaf_dir_name {
        None
    } else {
        leaf_name(&directory)
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&directory).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&directory) else {
            continue;
        };
        let relative = to_slash_path(relative);
        files.push(match &prefix {
            Some(prefix) => format!("{prefix}/{relative}"),
            None => relative,
        });
    }

    files.sort();
    log::debug!(
        "Listed {} files under '{}'",
        files.len(),
        directory.display()
    );
    Ok(files)
}

/// Drops trailing separators and redundant `.` components.
fn normalize_directory(directory: &Path) -> PathBuf {
    let normalized: PathBuf = directory.components().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Returns the directory's own name, resolving `.` and `..` when needed.
fn leaf_name(directory: &Path) -> Option<String> {
    match directory.file_name() {
        Some(name) => Some(name.to_string_lossy().into_owned()),
        None => directory
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())),
    }
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
