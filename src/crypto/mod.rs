//! Password material for AES-256 entry encryption.
//!
//! The cipher itself lives in the ZIP codec (WinZip AE-2, AES-256 in CTR mode
//! with HMAC-SHA1 authentication). This module only owns the secret and the
//! choice of encryption strength.
//!
//! # Deferred verification
//!
//! A ZIP archive has no archive-level password check. Each encrypted entry
//! carries its own password verification value, which is only inspected when
//! that entry's stream is opened. Opening an archive with the wrong password
//! therefore succeeds and the failure shows up on the first read.

mod password;

pub use password::Password;

/// Encryption strength applied to every entry added by an encrypted session.
pub(crate) const ENCRYPTION_MODE: zip::AesMode = zip::AesMode::Aes256;
