//! # zipsession
//!
//! Session-oriented access to ZIP archives with optional per-entry AES-256
//! encryption.
//!
//! An [`ArchiveSession`] owns one archive at a time, opened for reading or
//! created for writing, and exposes a small set of entry operations: add,
//! count, stat, read into memory, and extract to a directory. Container
//! parsing, compression and encryption are provided by the
//! [`zip`](https://docs.rs/zip) crate.
//!
//! ## Quick Start
//!
//! ### Creating an Archive
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, Result};
//!
//! fn main() -> Result<()> {
//!     let mut session = ArchiveSession::new();
//!     session.create_write("new.zip")?;
//!     session.add_entry("docs/readme.txt", "readme.txt")?;
//!     session.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, Result};
//!
//! fn main() -> Result<()> {
//!     let mut session = ArchiveSession::new();
//!     session.open_read("new.zip")?;
//!     for index in 0..session.count_entries()? {
//!         let (name, data) = session.read_entry(index)?;
//!         println!("{}: {} bytes", name, data.len());
//!     }
//!     session.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ### Encrypted Archives
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, Result};
//!
//! fn main() -> Result<()> {
//!     let mut session = ArchiveSession::new();
//!     session.create_write_encrypted("secret.zip", "password")?;
//!     session.add_entry("secret.txt", "secret.txt")?;
//!     session.close()?;
//!
//!     // Opening never checks the password; reading does.
//!     session.open_read_encrypted("secret.zip", "password")?;
//!     session.extract_entry(0, "./output")?;
//!     session.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate compression for new entries |
//! | `bzip2` | No | BZip2 compression |
//! | `zstd` | No | Zstandard compression |
//! | `cli` | No | Command-line interface tool |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Each failure is also reported to the
//! session's [`DiagnosticSink`](diagnostics::DiagnosticSink), which forwards
//! to the `log` facade by default.
//!
//! ```rust,no_run
//! use zipsession::{ArchiveSession, ErrorKind};
//!
//! let mut session = ArchiveSession::new();
//! match session.open_read("missing.zip") {
//!     Ok(()) => {}
//!     Err(e) if e.kind() == ErrorKind::Open => eprintln!("cannot open: {e}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//! }
//! ```
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod crypto;
pub mod diagnostics;
pub mod error;
pub mod listing;
pub mod safety;
pub mod session;

pub use crypto::Password;
pub use diagnostics::{CollectingSink, DiagnosticSink, LogSink, NoDiagnostics, sink_fn};
pub use error::{CodecCode, CodecFailure, Error, ErrorKind, Result};
pub use listing::{list_relative_files, list_relative_files_with_sink};
pub use safety::PathSafety;
pub use session::{ArchiveSession, Compression, EntryStat, SessionMode, SessionOptions};
