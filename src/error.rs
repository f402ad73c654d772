//! Error types for archive session operations.
//!
//! This module provides the [`Error`] enum which represents every failure an
//! [`ArchiveSession`](crate::ArchiveSession) or the directory lister can
//! report, along with a convenient [`Result<T>`] alias.
//!
//! Failures coming from the ZIP codec carry a [`CodecFailure`], the
//! structured `{code, os code, message}` triple that is also written to the
//! session's diagnostic sink.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, Error, ErrorKind};
//!
//! fn first_entry(path: &str) -> zipsession::Result<Vec<u8>> {
//!     let mut session = ArchiveSession::new();
//!     session.open_read_encrypted(path, "secret")?;
//!     match session.read_entry(0) {
//!         Ok((_, data)) => Ok(data),
//!         Err(e) if e.kind() == ErrorKind::OpenStream => {
//!             eprintln!("wrong password?");
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

use crate::session::SessionMode;

/// Message the ZIP codec uses when an encrypted entry is opened without a password.
const PASSWORD_REQUIRED: &str = "Password required to decrypt file";

/// Numeric error codes reported in a [`CodecFailure`].
///
/// The values follow the libzip numbering so that logs produced by tools
/// built on either library can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecCode {
    /// Read error.
    Read = 5,
    /// Write error.
    Write = 6,
    /// No such file or entry.
    NoEntry = 9,
    /// File already exists.
    Exists = 10,
    /// Can't open file.
    Open = 11,
    /// Compression method not supported.
    CompressionUnsupported = 16,
    /// Invalid argument.
    InvalidArgument = 18,
    /// Not a zip archive.
    NotZip = 19,
    /// Internal error.
    Internal = 20,
    /// Encryption method not supported.
    EncryptionUnsupported = 24,
    /// No password provided.
    NoPassword = 26,
    /// Wrong password provided.
    WrongPassword = 27,
}

impl CodecCode {
    /// Returns the numeric value of the code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for CodecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Read => "read error",
            Self::Write => "write error",
            Self::NoEntry => "no such file",
            Self::Exists => "file already exists",
            Self::Open => "can't open file",
            Self::CompressionUnsupported => "compression method not supported",
            Self::InvalidArgument => "invalid argument",
            Self::NotZip => "not a zip archive",
            Self::Internal => "internal error",
            Self::EncryptionUnsupported => "encryption method not supported",
            Self::NoPassword => "no password provided",
            Self::WrongPassword => "wrong password provided",
        };
        f.write_str(text)
    }
}

/// Structured failure reported by the ZIP codec or the filesystem beneath it.
///
/// This is the triple written to the diagnostic log on every failing
/// operation: a [`CodecCode`], the operating system error number when the
/// failure came from an I/O call, and the underlying message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFailure {
    /// Codec error code.
    pub code: CodecCode,
    /// Raw OS error number, if the failure originated in a system call.
    pub os_code: Option<i32>,
    /// Human-readable message from the codec.
    pub message: String,
}

impl CodecFailure {
    /// Creates a failure without an OS error number.
    pub fn new(code: CodecCode, message: impl Into<String>) -> Self {
        Self {
            code,
            os_code: None,
            message: message.into(),
        }
    }

    /// Wraps an I/O error, using `code` as the codec-level classification.
    pub fn io(code: CodecCode, error: &io::Error) -> Self {
        let code = match error.kind() {
            io::ErrorKind::NotFound => CodecCode::NoEntry,
            io::ErrorKind::AlreadyExists => CodecCode::Exists,
            _ => code,
        };
        Self {
            code,
            os_code: error.raw_os_error(),
            message: error.to_string(),
        }
    }

    /// Translates a `zip` crate error.
    ///
    /// `io_code` classifies plain I/O failures, which the codec reports
    /// without saying whether it was reading or writing at the time.
    pub fn from_zip(error: &ZipError, io_code: CodecCode) -> Self {
        match error {
            ZipError::Io(e) => Self::io(io_code, e),
            ZipError::InvalidArchive(_) => Self::new(CodecCode::NotZip, error.to_string()),
            ZipError::UnsupportedArchive(msg) if *msg == PASSWORD_REQUIRED => {
                Self::new(CodecCode::NoPassword, error.to_string())
            }
            ZipError::UnsupportedArchive(_) => {
                Self::new(CodecCode::CompressionUnsupported, error.to_string())
            }
            ZipError::FileNotFound => Self::new(CodecCode::NoEntry, error.to_string()),
            ZipError::InvalidPassword => Self::new(CodecCode::WrongPassword, error.to_string()),
            #[allow(unreachable_patterns)]
            _ => Self::new(CodecCode::Internal, error.to_string()),
        }
    }
}

impl fmt::Display for CodecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code.as_i32(), self.os_code.unwrap_or(0))?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for CodecFailure {}

/// Discriminant of an [`Error`], convenient for host bindings and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`Error::NotOpen`].
    NotOpen,
    /// See [`Error::AlreadyOpen`].
    AlreadyOpen,
    /// See [`Error::WrongMode`].
    WrongMode,
    /// See [`Error::DirectoryNotFound`].
    DirectoryNotFound,
    /// See [`Error::Open`].
    Open,
    /// See [`Error::Create`].
    Create,
    /// See [`Error::Close`].
    Close,
    /// See [`Error::Add`].
    Add,
    /// See [`Error::DuplicateEntry`].
    DuplicateEntry,
    /// See [`Error::EncryptionSetup`].
    EncryptionSetup,
    /// See [`Error::Count`].
    Count,
    /// See [`Error::Index`].
    Index,
    /// See [`Error::Stat`].
    Stat,
    /// See [`Error::EntryTooLarge`].
    EntryTooLarge,
    /// See [`Error::OpenStream`].
    OpenStream,
    /// See [`Error::Read`].
    Read,
    /// See [`Error::PathTraversal`].
    PathTraversal,
    /// See [`Error::CreateFile`].
    CreateFile,
    /// See [`Error::WriteFile`].
    WriteFile,
    /// See [`Error::InvalidCompressionLevel`].
    InvalidCompressionLevel,
    /// See [`Error::Io`].
    Io,
}

/// The main error type for archive session operations.
///
/// | Category | Variants |
/// |----------|----------|
/// | Session state | [`NotOpen`][Self::NotOpen], [`AlreadyOpen`][Self::AlreadyOpen], [`WrongMode`][Self::WrongMode] |
/// | Archive lifecycle | [`Open`][Self::Open], [`Create`][Self::Create], [`Close`][Self::Close] |
/// | Writing | [`Add`][Self::Add], [`DuplicateEntry`][Self::DuplicateEntry], [`EncryptionSetup`][Self::EncryptionSetup] |
/// | Reading | [`Count`][Self::Count], [`Index`][Self::Index], [`Stat`][Self::Stat], [`OpenStream`][Self::OpenStream], [`Read`][Self::Read] |
/// | Extraction | [`PathTraversal`][Self::PathTraversal], [`CreateFile`][Self::CreateFile], [`WriteFile`][Self::WriteFile] |
/// | Host filesystem | [`DirectoryNotFound`][Self::DirectoryNotFound], [`Io`][Self::Io] |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An entry-level operation was called on a closed session.
    #[error("archive not open (operation: {operation})")]
    NotOpen {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// `open`/`create` was called while the session already holds an archive.
    ///
    /// Close the session first; a session never switches archives or modes
    /// without passing through the closed state.
    #[error("archive already open: {}", path.display())]
    AlreadyOpen {
        /// Path of the archive currently held by the session.
        path: PathBuf,
    },

    /// The operation is not available in the session's current open mode.
    ///
    /// Adding entries needs a session created for writing; reading entry
    /// contents needs a session opened for reading.
    #[error("{operation} is not supported while the archive is open for {mode}")]
    WrongMode {
        /// The operation that was attempted.
        operation: &'static str,
        /// The mode the session is currently in.
        mode: SessionMode,
    },

    /// The directory passed to the lister does not exist.
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound {
        /// The directory that was requested.
        path: PathBuf,
    },

    /// An existing archive could not be opened.
    ///
    /// Either the file does not exist or the codec rejected it as corrupt
    /// or not a ZIP archive.
    #[error("failed to open archive {}: {source}", path.display())]
    Open {
        /// Path of the archive.
        path: PathBuf,
        /// Codec failure.
        source: CodecFailure,
    },

    /// A new archive could not be created.
    ///
    /// Creation is exclusive: an existing file at the path is never overwritten.
    #[error("failed to create archive {}: {source}", path.display())]
    Create {
        /// Path of the archive.
        path: PathBuf,
        /// Codec failure.
        source: CodecFailure,
    },

    /// Committing the archive failed.
    ///
    /// The session is closed regardless, but the archive on disk may be
    /// incomplete or missing.
    #[error("failed to close archive {}: {source}", path.display())]
    Close {
        /// Path of the archive.
        path: PathBuf,
        /// Codec failure.
        source: CodecFailure,
    },

    /// An entry could not be added from its source file.
    #[error("failed to add entry '{entry}': {source}")]
    Add {
        /// Name of the entry inside the archive.
        entry: String,
        /// Codec failure.
        source: CodecFailure,
    },

    /// An entry with the same name already exists in the archive.
    #[error("entry '{entry}' already exists in the archive")]
    DuplicateEntry {
        /// Name of the entry inside the archive.
        entry: String,
    },

    /// AES-256 encryption could not be attached to a new entry.
    #[error("failed to set up encryption for entry '{entry}': {source}")]
    EncryptionSetup {
        /// Name of the entry inside the archive.
        entry: String,
        /// Codec failure.
        source: CodecFailure,
    },

    /// The number of entries could not be determined.
    #[error("failed to count entries: {source}")]
    Count {
        /// Codec failure.
        source: CodecFailure,
    },

    /// The entry index is outside `0..count`.
    #[error("entry index {index} out of range (archive has {count} entries)")]
    Index {
        /// The requested index.
        index: i64,
        /// Number of entries in the archive.
        count: i64,
    },

    /// Entry metadata could not be read.
    #[error("failed to stat entry {index}: {source}")]
    Stat {
        /// The requested index.
        index: i64,
        /// Codec failure.
        source: CodecFailure,
    },

    /// The entry is larger than the configured in-memory limit.
    #[error("entry {index} ({name}) is {size} bytes, limit is {limit}")]
    EntryTooLarge {
        /// The requested index.
        index: i64,
        /// Entry name.
        name: String,
        /// Uncompressed size of the entry.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The decompression stream for an entry could not be opened.
    ///
    /// For encrypted entries this is where a wrong password surfaces: the
    /// archive opens fine, the stream does not.
    #[error("failed to open entry {index} ({name}): {source}")]
    OpenStream {
        /// The requested index.
        index: i64,
        /// Entry name.
        name: String,
        /// Codec failure.
        source: CodecFailure,
    },

    /// Reading entry contents failed or returned fewer bytes than expected.
    #[error("failed to read entry {index} ({name}): {source}")]
    Read {
        /// The requested index.
        index: i64,
        /// Entry name.
        name: String,
        /// Codec failure.
        source: CodecFailure,
    },

    /// The entry name would place the extracted file outside the destination.
    #[error("path traversal in entry {index}: {name}")]
    PathTraversal {
        /// The requested index.
        index: i64,
        /// Entry name.
        name: String,
    },

    /// The destination file could not be created.
    #[error("failed to create file {}: {source}", path.display())]
    CreateFile {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination file was created but writing its contents failed.
    #[error("failed to write file {}: {source}", path.display())]
    WriteFile {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Compression level outside 0-9.
    #[error("invalid compression level {level} (expected 0-9)")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u32,
    },

    /// An I/O error occurred while walking a directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOpen { .. } => ErrorKind::NotOpen,
            Self::AlreadyOpen { .. } => ErrorKind::AlreadyOpen,
            Self::WrongMode { .. } => ErrorKind::WrongMode,
            Self::DirectoryNotFound { .. } => ErrorKind::DirectoryNotFound,
            Self::Open { .. } => ErrorKind::Open,
            Self::Create { .. } => ErrorKind::Create,
            Self::Close { .. } => ErrorKind::Close,
            Self::Add { .. } => ErrorKind::Add,
            Self::DuplicateEntry { .. } => ErrorKind::DuplicateEntry,
            Self::EncryptionSetup { .. } => ErrorKind::EncryptionSetup,
            Self::Count { .. } => ErrorKind::Count,
            Self::Index { .. } => ErrorKind::Index,
            Self::Stat { .. } => ErrorKind::Stat,
            Self::EntryTooLarge { .. } => ErrorKind::EntryTooLarge,
            Self::OpenStream { .. } => ErrorKind::OpenStream,
            Self::Read { .. } => ErrorKind::Read,
            Self::PathTraversal { .. } => ErrorKind::PathTraversal,
            Self::CreateFile { .. } => ErrorKind::CreateFile,
            Self::WriteFile { .. } => ErrorKind::WriteFile,
            Self::InvalidCompressionLevel { .. } => ErrorKind::InvalidCompressionLevel,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the codec failure behind this error, if there is one.
    pub fn codec_failure(&self) -> Option<&CodecFailure> {
        match self {
            Self::Open { source, .. }
            | Self::Create { source, .. }
            | Self::Close { source, .. }
            | Self::Add { source, .. }
            | Self::EncryptionSetup { source, .. }
            | Self::Count { source }
            | Self::Stat { source, .. }
            | Self::OpenStream { source, .. }
            | Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns true if this error is the deferred symptom of a wrong or
    /// missing password.
    pub fn is_password_error(&self) -> bool {
        matches!(
            self.codec_failure().map(|f| f.code),
            Some(CodecCode::WrongPassword | CodecCode::NoPassword)
        )
    }
}

/// A specialized Result type for archive session operations.
pub type Result<T> = std::result::Result<T, Error>;
