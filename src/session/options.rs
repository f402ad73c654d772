//! Session options for compression, limits and extraction safety.

use zip::CompressionMethod;
use zip::write::{FileOptions, SimpleFileOptions};

use crate::crypto::{ENCRYPTION_MODE, Password};
use crate::safety::PathSafety;

/// Compression applied to entries added by a write session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Compression {
    /// Store entries without compression.
    Stored,
    /// Deflate (requires `deflate` feature).
    #[cfg(feature = "deflate")]
    Deflated,
    /// BZip2 (requires `bzip2` feature).
    #[cfg(feature = "bzip2")]
    Bzip2,
    /// Zstandard (requires `zstd` feature).
    #[cfg(feature = "zstd")]
    Zstd,
}

impl Default for Compression {
    fn default() -> Self {
        #[cfg(feature = "deflate")]
        {
            Self::Deflated
        }
        #[cfg(not(feature = "deflate"))]
        {
            Self::Stored
        }
    }
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Stored => CompressionMethod::Stored,
            #[cfg(feature = "deflate")]
            Self::Deflated => CompressionMethod::Deflated,
            #[cfg(feature = "bzip2")]
            Self::Bzip2 => CompressionMethod::Bzip2,
            #[cfg(feature = "zstd")]
            Self::Zstd => CompressionMethod::Zstd,
        }
    }

    /// Maps a 0-9 level onto the range the codec accepts for this method.
    ///
    /// Deflate and BZip2 start at 1, so level 0 selects their fastest setting.
    fn codec_level(self, level: u32) -> Option<i64> {
        match self {
            Self::Stored => None,
            #[cfg(feature = "deflate")]
            Self::Deflated => Some(i64::from(level.max(1))),
            #[cfg(feature = "bzip2")]
            Self::Bzip2 => Some(i64::from(level.max(1))),
            #[allow(unreachable_patterns)]
            _ => Some(i64::from(level)),
        }
    }
}

/// Options controlling how a session writes and extracts entries.
///
/// # Example
///
/// ```rust
/// use zipsession::{ArchiveSession, Compression, SessionOptions};
///
/// let options = SessionOptions::new()
///     .compression(Compression::Stored)
///     .max_entry_size(64 * 1024 * 1024);
/// let session = ArchiveSession::with_options(options);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Compression method for new entries.
    pub compression: Compression,
    /// Compression level (0-9); `None` uses the codec default.
    pub level: Option<u32>,
    /// Largest entry `read_entry` will buffer in memory.
    pub max_entry_size: Option<u64>,
    /// Entry name validation applied by `extract_entry`.
    pub path_safety: PathSafety,
    /// Force ZIP64 headers on new entries.
    pub large_file: bool,
}

impl SessionOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression method.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the compression level (0-9).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`](crate::Error::InvalidCompressionLevel)
    /// if the level is greater than 9.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zipsession::SessionOptions;
    ///
    /// let opts = SessionOptions::new().level(7).unwrap();
    /// assert_eq!(opts.level, Some(7));
    ///
    /// assert!(SessionOptions::new().level(10).is_err());
    /// ```
    pub fn level(mut self, level: u32) -> crate::Result<Self> {
        if level > 9 {
            return Err(crate::Error::InvalidCompressionLevel { level });
        }
        self.level = Some(level);
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.level = Some(level.min(9));
        self
    }

    /// Limits the size of entries that can be read into memory.
    pub fn max_entry_size(mut self, limit: u64) -> Self {
        self.max_entry_size = Some(limit);
        self
    }

    /// Sets the entry name validation policy for extraction.
    pub fn path_safety(mut self, policy: PathSafety) -> Self {
        self.path_safety = policy;
        self
    }

    /// Forces ZIP64 headers for new entries.
    pub fn large_file(mut self, large_file: bool) -> Self {
        self.large_file = large_file;
        self
    }

    /// Builds the codec options for one new entry.
    pub(crate) fn file_options<'k>(&self, password: Option<&'k Password>) -> FileOptions<'k, ()> {
        let level = self
            .level
            .and_then(|level| self.compression.codec_level(level));
        let options = SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .compression_level(level)
            .large_file(self.large_file);
        match password {
            Some(password) => options.with_aes_encryption(ENCRYPTION_MODE, password.as_str()),
            None => options,
        }
    }
}
