//! Archive session: one ZIP archive opened for reading or created for writing.
//!
//! An [`ArchiveSession`] moves between three states:
//!
//! ```text
//! Closed --open_read*/create_write*--> Open(Read | Write) --close--> Closed
//! ```
//!
//! Entry operations are only valid while open; a closed session accepts only
//! `open_read*` and `create_write*`. There is no transition between the two
//! open modes without closing first.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipsession::ArchiveSession;
//!
//! # fn main() -> zipsession::Result<()> {
//! let mut session = ArchiveSession::new();
//! session.create_write_encrypted("out.zip", "secret")?;
//! session.add_entry("a.txt", "a.txt")?;
//! session.close()?;
//!
//! session.open_read_encrypted("out.zip", "secret")?;
//! let (name, data) = session.read_entry(0)?;
//! assert_eq!(name, "a.txt");
//! # let _ = data;
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Passwords
//!
//! Password verification is deferred to the first read of an encrypted entry,
//! because the ZIP format has no archive-level password check. A successful
//! `open_read_encrypted` is provisional until an entry has been read; a wrong
//! password surfaces as [`Error::OpenStream`] from [`ArchiveSession::read_entry`]
//! or [`ArchiveSession::extract_entry`].

mod options;
mod read;
mod write;

pub use options::{Compression, SessionOptions};

use std::fmt;
use std::path::Path;

use crate::crypto::Password;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::{CodecCode, CodecFailure};
use crate::{Error, Result};

use read::ReadHandle;
use write::WriteHandle;

/// The mode a session was opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Opened read-only from an existing archive.
    Read,
    /// Created as a new archive for writing.
    Write,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "reading"),
            Self::Write => write!(f, "writing"),
        }
    }
}

/// Metadata of one entry, obtained without reading its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    /// Zero-based position in the archive.
    pub index: i64,
    /// UTF-8 entry name (may contain `/` separators).
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Whether the entry's data is encrypted.
    pub encrypted: bool,
}

enum State {
    Closed,
    Read(ReadHandle),
    Write(WriteHandle),
}

/// A stateful handle on one ZIP archive.
///
/// The session exclusively owns the underlying archive handle and the
/// optional password. Dropping a session that is still open closes it, which
/// finalizes a write session; a failure at that point can only be observed
/// through the diagnostic sink, so call [`close`](Self::close) explicitly when
/// the outcome matters.
///
/// Every failing operation returns a structured [`Error`] and reports it to
/// the session's [`DiagnosticSink`] ([`LogSink`] unless another was given).
///
/// A session is meant to be driven by one caller at a time; it performs no
/// internal locking.
pub struct ArchiveSession {
    state: State,
    password: Option<Password>,
    options: SessionOptions,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for ArchiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArchiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSession")
            .field("mode", &self.mode())
            .field("path", &self.path())
            .field("encrypted", &self.is_encrypted())
            .field("options", &self.options)
            .finish()
    }
}

impl ArchiveSession {
    /// Creates a closed session reporting failures to [`LogSink`].
    pub fn new() -> Self {
        Self::with_sink(LogSink)
    }

    /// Creates a closed session with the given options.
    pub fn with_options(options: SessionOptions) -> Self {
        Self::new().options(options)
    }

    /// Creates a closed session reporting failures to `sink`.
    pub fn with_sink(sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            state: State::Closed,
            password: None,
            options: SessionOptions::default(),
            sink: Box::new(sink),
        }
    }

    /// Replaces the session options.
    ///
    /// Options apply to the operations performed after the call, including
    /// on an already open session.
    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the current options.
    pub fn session_options(&self) -> &SessionOptions {
        &self.options
    }

    /// Returns true if an archive is open.
    pub fn is_open(&self) -> bool {
        !matches!(self.state, State::Closed)
    }

    /// Returns the open mode, or `None` when closed.
    pub fn mode(&self) -> Option<SessionMode> {
        match self.state {
            State::Closed => None,
            State::Read(_) => Some(SessionMode::Read),
            State::Write(_) => Some(SessionMode::Write),
        }
    }

    /// Returns the path of the open archive.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            State::Closed => None,
            State::Read(handle) => Some(handle.path()),
            State::Write(handle) => Some(handle.path()),
        }
    }

    /// Returns true if the session holds a (non-empty) password.
    pub fn is_encrypted(&self) -> bool {
        self.password.is_some()
    }

    /// Opens an existing archive read-only.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyOpen`] if the session already holds an archive
    /// - [`Error::Open`] if the file is missing or not a valid ZIP archive
    pub fn open_read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let result = self.open(path.as_ref(), None);
        self.report("open_read", result)
    }

    /// Opens an existing archive read-only, decrypting entries with `password`.
    ///
    /// The password is not checked here; see the module documentation.
    /// An empty password behaves like [`open_read`](Self::open_read).
    pub fn open_read_encrypted(
        &mut self,
        path: impl AsRef<Path>,
        password: impl Into<Password>,
    ) -> Result<()> {
        let result = self.open(path.as_ref(), Some(password.into()));
        self.report("open_read_encrypted", result)
    }

    /// Creates a new archive for writing.
    ///
    /// Creation is exclusive: the call fails if a file already exists at
    /// `path` or if its parent directory does not exist.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyOpen`] if the session already holds an archive
    /// - [`Error::Create`] if the file cannot be created
    pub fn create_write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let result = self.create(path.as_ref(), None);
        self.report("create_write", result)
    }

    /// Creates a new archive whose entries are encrypted with AES-256.
    ///
    /// Every entry added through this session is encrypted with `password`.
    /// An empty password behaves like [`create_write`](Self::create_write).
    pub fn create_write_encrypted(
        &mut self,
        path: impl AsRef<Path>,
        password: impl Into<Password>,
    ) -> Result<()> {
        let result = self.create(path.as_ref(), Some(password.into()));
        self.report("create_write_encrypted", result)
    }

    /// Closes the session, committing pending writes.
    ///
    /// Closing a closed session is a no-op. The handle is released and the
    /// password wiped even when committing fails, so the session can be
    /// reused afterwards.
    ///
    /// # Errors
    ///
    /// - [`Error::Close`] if the archive could not be written out; the file
    ///   on disk may then be incomplete
    pub fn close(&mut self) -> Result<()> {
        let result = self.close_handle();
        self.report("close", result)
    }

    /// Returns the number of entries in the open archive.
    ///
    /// For write sessions this counts the entries added so far.
    pub fn count_entries(&self) -> Result<i64> {
        let result = self.count();
        self.report("count_entries", result)
    }

    /// Lists regular files under `directory`; see [`crate::list_relative_files`].
    ///
    /// This does not touch session state.
    pub fn list_relative_files(
        directory: impl AsRef<Path>,
        exclude_leaf_dir_name: bool,
    ) -> Result<Vec<String>> {
        crate::listing::list_relative_files(directory, exclude_leaf_dir_name)
    }

    fn open(&mut self, path: &Path, password: Option<Password>) -> Result<()> {
        self.ensure_closed()?;
        let handle = ReadHandle::open(path)?;
        self.password = password.and_then(Password::non_empty);
        log::debug!(
            "Opened '{}' for reading ({} entries, encrypted session: {})",
            path.display(),
            handle.len(),
            self.password.is_some()
        );
        self.state = State::Read(handle);
        Ok(())
    }

    fn create(&mut self, path: &Path, password: Option<Password>) -> Result<()> {
        self.ensure_closed()?;
        let handle = WriteHandle::create(path)?;
        self.password = password.and_then(Password::non_empty);
        log::debug!(
            "Created '{}' for writing (encrypted session: {})",
            path.display(),
            self.password.is_some()
        );
        self.state = State::Write(handle);
        Ok(())
    }

    fn close_handle(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, State::Closed);
        self.password = None;
        match state {
            State::Closed => Ok(()),
            State::Read(handle) => {
                log::debug!("Closed '{}'", handle.path().display());
                Ok(())
            }
            State::Write(handle) => handle.finish(),
        }
    }

    fn count(&self) -> Result<i64> {
        let len = match &self.state {
            State::Closed => {
                return Err(Error::NotOpen {
                    operation: "count_entries",
                });
            }
            State::Read(handle) => handle.len(),
            State::Write(handle) => handle.len(),
        };
        i64::try_from(len).map_err(|_| Error::Count {
            source: CodecFailure::new(
                CodecCode::Internal,
                format!("entry count {len} does not fit in i64"),
            ),
        })
    }

    fn ensure_closed(&self) -> Result<()> {
        match self.path() {
            Some(path) => Err(Error::AlreadyOpen {
                path: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }

    /// Passes `result` through, reporting an error to the sink first.
    fn report<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.sink.on_failure(operation, e);
        }
        result
    }
}

impl Drop for ArchiveSession {
    fn drop(&mut self) {
        if self.is_open() {
            let _ = self.close();
        }
    }
}

/// Validates an `i64` entry index against the entry count.
pub(crate) fn checked_index(index: i64, count: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&position| position < count)
        .ok_or(Error::Index {
            index,
            count: i64::try_from(count).unwrap_or(i64::MAX),
        })
}
