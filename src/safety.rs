//! Extraction path validation.
//!
//! Entry names are caller-supplied strings stored verbatim in the archive.
//! Before an entry is written to disk its name is joined with the destination
//! directory; this module decides whether that join is allowed.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Policy for validating extraction paths.
///
/// # Examples
///
/// ```rust
/// use zipsession::safety::PathSafety;
///
/// // Default: strict validation (recommended for untrusted archives)
/// let policy = PathSafety::default();
/// assert_eq!(policy, PathSafety::Strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathSafety {
    /// Reject names that could escape the destination directory.
    ///
    /// This rejects:
    /// - names containing `..` components (with `/` or `\` separators)
    /// - absolute names and names carrying a drive or UNC prefix
    /// - empty names
    #[default]
    Strict,
    /// Join names verbatim (DANGEROUS - only for archives you created).
    ///
    /// An entry named `../../etc/passwd` will be written outside the
    /// destination directory.
    Disabled,
}

/// Validates an entry name and returns the path it should be extracted to.
///
/// Intermediate directories are not created; a name that points into a
/// missing subdirectory yields a path whose creation will fail.
///
/// # Arguments
///
/// * `entry_name` - The name stored in the archive
/// * `dest_dir` - The destination directory
/// * `policy` - The path safety policy to enforce
/// * `entry_index` - Index of the entry (for error reporting)
pub fn validate_extract_path(
    entry_name: &str,
    dest_dir: &Path,
    policy: PathSafety,
    entry_index: i64,
) -> Result<PathBuf> {
    if policy == PathSafety::Strict && !is_safe_entry_name(entry_name) {
        return Err(Error::PathTraversal {
            index: entry_index,
            name: entry_name.to_string(),
        });
    }
    Ok(dest_dir.join(entry_name))
}

/// Returns true if the entry name stays inside any directory it is joined to.
pub fn is_safe_entry_name(entry_name: &str) -> bool {
    if entry_name.is_empty() || entry_name.contains('\0') {
        return false;
    }
    if entry_name.starts_with(['/', '\\']) {
        return false;
    }
    if entry_name.split(['/', '\\']).any(|part| part == "..") {
        return false;
    }
    Path::new(entry_name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
