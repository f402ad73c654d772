//! Write-side operations: exclusive create, adding entries, finalizing.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::result::ZipError;

use super::{ArchiveSession, EntryStat, SessionMode, SessionOptions, State};
use crate::crypto::Password;
use crate::error::{CodecCode, CodecFailure};
use crate::{Error, Result};

/// An archive being written.
pub(super) struct WriteHandle {
    path: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    /// Entries added so far, in index order.
    added: Vec<EntryStat>,
    names: HashSet<String>,
}

impl WriteHandle {
    pub(super) fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Error::Create {
                path: path.to_path_buf(),
                source: CodecFailure::io(CodecCode::Open, &e),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipWriter::new(BufWriter::new(file)),
            added: Vec::new(),
            names: HashSet::new(),
        })
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn len(&self) -> usize {
        self.added.len()
    }

    pub(super) fn entries(&self) -> Vec<EntryStat> {
        self.added.clone()
    }

    fn add(
        &mut self,
        entry_name: &str,
        source_path: &Path,
        options: &SessionOptions,
        password: Option<&Password>,
    ) -> Result<()> {
        if self.names.contains(entry_name) {
            return Err(Error::DuplicateEntry {
                entry: entry_name.to_string(),
            });
        }
        let add_error = |source| Error::Add {
            entry: entry_name.to_string(),
            source,
        };

        let mut source = File::open(source_path)
            .map_err(|e| add_error(CodecFailure::io(CodecCode::Open, &e)))?;
        let metadata = source
            .metadata()
            .map_err(|e| add_error(CodecFailure::io(CodecCode::Read, &e)))?;
        if !metadata.is_file() {
            return Err(add_error(CodecFailure::new(
                CodecCode::InvalidArgument,
                format!("'{}' is not a regular file", source_path.display()),
            )));
        }

        // With a password, starting the entry is also where the AES header
        // (salt, password verifier) is generated and written.
        self.writer
            .start_file(entry_name, options.file_options(password))
            .map_err(|e| {
                let source = CodecFailure::from_zip(&e, CodecCode::Write);
                if password.is_some() && is_encryption_failure(&e) {
                    Error::EncryptionSetup {
                        entry: entry_name.to_string(),
                        source,
                    }
                } else {
                    add_error(source)
                }
            })?;

        let written = match io::copy(&mut source, &mut self.writer) {
            Ok(written) => written,
            Err(e) => {
                if let Err(abort) = self.writer.abort_file() {
                    log::warn!(
                        "Failed to discard partial entry '{}' in '{}': {}",
                        entry_name,
                        self.path.display(),
                        abort
                    );
                }
                return Err(add_error(CodecFailure::io(CodecCode::Read, &e)));
            }
        };

        self.names.insert(entry_name.to_string());
        self.added.push(EntryStat {
            index: i64::try_from(self.added.len()).unwrap_or(i64::MAX),
            name: entry_name.to_string(),
            size: written,
            encrypted: password.is_some(),
        });
        log::debug!(
            "Added entry '{}' from '{}' ({} bytes, encrypted: {})",
            entry_name,
            source_path.display(),
            written,
            password.is_some()
        );
        Ok(())
    }

    /// Writes the central directory and flushes the file.
    pub(super) fn finish(self) -> Result<()> {
        let path = self.path;
        let close_error = |source| Error::Close {
            path: path.clone(),
            source,
        };
        let buffered = self
            .writer
            .finish()
            .map_err(|e| close_error(CodecFailure::from_zip(&e, CodecCode::Write)))?;
        let file = buffered
            .into_inner()
            .map_err(|e| close_error(CodecFailure::io(CodecCode::Write, e.error())))?;
        file.sync_all()
            .map_err(|e| close_error(CodecFailure::io(CodecCode::Write, &e)))?;

        log::debug!(
            "Closed '{}' ({} entries written)",
            path.display(),
            self.added.len()
        );
        Ok(())
    }
}

/// Whether a `start_file` failure comes from attaching AES to the entry
/// rather than from the entry itself.
fn is_encryption_failure(error: &ZipError) -> bool {
    match error {
        ZipError::UnsupportedArchive(message) | ZipError::InvalidArchive(message) => {
            let message = message.to_ascii_lowercase();
            message.contains("aes") || message.contains("encrypt")
        }
        _ => false,
    }
}

impl ArchiveSession {
    /// Adds the file at `source_path` as entry `entry_name`.
    ///
    /// If the session was created with a password, the new entry is
    /// encrypted with AES-256 under that password. A failed add leaves the
    /// session open and usable.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] / [`Error::WrongMode`] unless open for writing
    /// - [`Error::DuplicateEntry`] if an entry with this name was already added
    /// - [`Error::Add`] if the source file cannot be opened or read
    /// - [`Error::EncryptionSetup`] if encryption cannot be attached to the entry
    pub fn add_entry(&mut self, entry_name: &str, source_path: impl AsRef<Path>) -> Result<()> {
        let result = match &mut self.state {
            State::Write(handle) => handle.add(
                entry_name,
                source_path.as_ref(),
                &self.options,
                self.password.as_ref(),
            ),
            State::Read(_) => Err(Error::WrongMode {
                operation: "add_entry",
                mode: SessionMode::Read,
            }),
            State::Closed => Err(Error::NotOpen {
                operation: "add_entry",
            }),
        };
        self.report("add_entry", result)
    }
}
