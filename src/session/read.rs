//! Read-side entry operations: stat, read into memory, extract.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::{ArchiveSession, EntryStat, SessionMode, State, checked_index};
use crate::crypto::Password;
use crate::error::{CodecCode, CodecFailure};
use crate::safety::validate_extract_path;
use crate::{Error, Result};

/// An archive opened read-only.
pub(super) struct ReadHandle {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ReadHandle {
    pub(super) fn open(path: &Path) -> Result<Self> {
        let open_error = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|e| open_error(CodecFailure::io(CodecCode::Open, &e)))?;
        let archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| open_error(CodecFailure::from_zip(&e, CodecCode::Read)))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn len(&self) -> usize {
        self.archive.len()
    }

    fn stat(&mut self, index: i64) -> Result<EntryStat> {
        let position = checked_index(index, self.archive.len())?;
        let file = self
            .archive
            .by_index_raw(position)
            .map_err(|e| Error::Stat {
                index,
                source: CodecFailure::from_zip(&e, CodecCode::Read),
            })?;
        Ok(EntryStat {
            index,
            name: file.name().to_string(),
            size: file.size(),
            encrypted: file.encrypted(),
        })
    }

    fn read(
        &mut self,
        index: i64,
        password: Option<&Password>,
        max_entry_size: Option<u64>,
    ) -> Result<(String, Vec<u8>)> {
        let stat = self.stat(index)?;
        let limit = max_entry_size.unwrap_or(u64::MAX);
        let too_large = || Error::EntryTooLarge {
            index,
            name: stat.name.clone(),
            size: stat.size,
            limit,
        };
        if stat.size > limit {
            return Err(too_large());
        }
        let size = usize::try_from(stat.size).map_err(|_| too_large())?;

        let position = checked_index(index, self.archive.len())?;
        // The stream borrows the archive and is closed when it goes out of
        // scope, on success and on every early return below.
        let opened = match password {
            Some(password) if stat.encrypted => {
                self.archive.by_index_decrypt(position, password.as_bytes())
            }
            _ => self.archive.by_index(position),
        };
        let mut stream = opened.map_err(|e| Error::OpenStream {
            index,
            name: stat.name.clone(),
            source: CodecFailure::from_zip(&e, CodecCode::Read),
        })?;

        let read_error = |source| Error::Read {
            index,
            name: stat.name.clone(),
            source,
        };
        let mut data = vec![0u8; size];
        stream
            .read_exact(&mut data)
            .map_err(|e| read_error(CodecFailure::io(CodecCode::Read, &e)))?;

        // Reading past the end runs the codec's CRC / authentication check.
        let mut trailing = [0u8; 1];
        match stream.read(&mut trailing) {
            Ok(0) => {}
            Ok(_) => {
                return Err(read_error(CodecFailure::new(
                    CodecCode::Read,
                    format!("entry is longer than its recorded size of {size} bytes"),
                )));
            }
            Err(e) => return Err(read_error(CodecFailure::io(CodecCode::Read, &e))),
        }
        drop(stream);

        Ok((stat.name, data))
    }
}

/// Narrows the session state to a read handle.
fn reader<'a>(state: &'a mut State, operation: &'static str) -> Result<&'a mut ReadHandle> {
    match state {
        State::Read(handle) => Ok(handle),
        State::Write(_) => Err(Error::WrongMode {
            operation,
            mode: SessionMode::Write,
        }),
        State::Closed => Err(Error::NotOpen { operation }),
    }
}

impl ArchiveSession {
    /// Returns the name and size of the entry at `index` without reading it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] / [`Error::WrongMode`] unless open for reading
    /// - [`Error::Index`] if `index` is not in `0..count_entries()`
    /// - [`Error::Stat`] if the codec cannot read the entry's metadata
    pub fn stat_entry(&mut self, index: i64) -> Result<EntryStat> {
        let result = reader(&mut self.state, "stat_entry").and_then(|handle| handle.stat(index));
        self.report("stat_entry", result)
    }

    /// Returns every entry's metadata, in index order.
    ///
    /// Works in both modes; a write session reports the entries added so far
    /// with the number of bytes copied into each.
    pub fn entries(&mut self) -> Result<Vec<EntryStat>> {
        let result = self.collect_entries("entries");
        self.report("entries", result)
    }

    /// Returns every entry name, in index order.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let result = self
            .collect_entries("entry_names")
            .map(|entries| entries.into_iter().map(|e| e.name).collect());
        self.report("entry_names", result)
    }

    /// Reads the entry at `index` fully into memory.
    ///
    /// The entry is decrypted with the session password when it is
    /// encrypted. Returns the entry name and its contents.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] / [`Error::WrongMode`] unless open for reading
    /// - [`Error::Index`] if `index` is out of range
    /// - [`Error::EntryTooLarge`] if the entry exceeds
    ///   [`SessionOptions::max_entry_size`](super::SessionOptions::max_entry_size)
    /// - [`Error::OpenStream`] if the entry cannot be opened, which is how a
    ///   wrong or missing password shows up
    /// - [`Error::Read`] if decompression fails, the data is short, or the
    ///   integrity check fails
    pub fn read_entry(&mut self, index: i64) -> Result<(String, Vec<u8>)> {
        let result = self.read_into_memory("read_entry", index);
        self.report("read_entry", result)
    }

    /// Writes the entry at `index` to `destination_dir` joined with its name.
    ///
    /// Missing intermediate directories are not created: extracting
    /// `sub/a.txt` into a directory without `sub` fails with
    /// [`Error::CreateFile`]. An existing file at the target is replaced.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// All errors of [`read_entry`](Self::read_entry), plus:
    /// - [`Error::PathTraversal`] if the name is rejected by the configured
    ///   [`PathSafety`](crate::safety::PathSafety)
    /// - [`Error::CreateFile`] if the destination cannot be created
    /// - [`Error::WriteFile`] if writing the contents fails
    pub fn extract_entry(
        &mut self,
        index: i64,
        destination_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let result = self.extract_to(index, destination_dir.as_ref());
        self.report("extract_entry", result)
    }

    fn read_into_memory(
        &mut self,
        operation: &'static str,
        index: i64,
    ) -> Result<(String, Vec<u8>)> {
        reader(&mut self.state, operation)?.read(
            index,
            self.password.as_ref(),
            self.options.max_entry_size,
        )
    }

    fn extract_to(&mut self, index: i64, destination_dir: &Path) -> Result<PathBuf> {
        let (name, data) = self.read_into_memory("extract_entry", index)?;
        let target = validate_extract_path(&name, destination_dir, self.options.path_safety, index)?;

        let mut file = File::create(&target).map_err(|source| Error::CreateFile {
            path: target.clone(),
            source,
        })?;
        file.write_all(&data)
            .and_then(|()| file.flush())
            .map_err(|source| Error::WriteFile {
                path: target.clone(),
                source,
            })?;

        log::debug!(
            "Extracted entry {} ({} bytes) to '{}'",
            index,
            data.len(),
            target.display()
        );
        Ok(target)
    }

    fn collect_entries(&mut self, operation: &'static str) -> Result<Vec<EntryStat>> {
        match &mut self.state {
            State::Closed => Err(Error::NotOpen { operation }),
            State::Write(handle) => Ok(handle.entries()),
            State::Read(handle) => {
                let count = i64::try_from(handle.len()).unwrap_or(i64::MAX);
                (0..count).map(|index| handle.stat(index)).collect()
            }
        }
    }
}
