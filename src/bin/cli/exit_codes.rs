//! Exit codes for the CLI tool.

use zipsession::{Error, ErrorKind};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Operation completed with warnings
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// Wrong password
pub const WRONG_PASSWORD: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    BadArchive,
    WrongPassword,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::WrongPassword => WRONG_PASSWORD,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }

    /// Keeps the more severe of two codes, preferring the first on ties.
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    fn severity(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Warning => 1,
            _ => 2,
        }
    }
}

/// Converts a session error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    if error.is_password_error() {
        return ExitCode::WrongPassword;
    }
    match error.kind() {
        ErrorKind::Io
        | ErrorKind::Create
        | ErrorKind::Close
        | ErrorKind::Add
        | ErrorKind::CreateFile
        | ErrorKind::WriteFile => ExitCode::IoError,
        ErrorKind::Open
        | ErrorKind::Count
        | ErrorKind::Stat
        | ErrorKind::OpenStream
        | ErrorKind::Read => ExitCode::BadArchive,
        ErrorKind::DirectoryNotFound | ErrorKind::InvalidCompressionLevel => ExitCode::BadArgs,
        // Session misuse, traversal, limits and future error kinds
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipsession::{CodecCode, CodecFailure};

    #[test]
    fn test_password_errors_map_to_wrong_password() {
        let err = Error::OpenStream {
            index: 0,
            name: "a.txt".into(),
            source: CodecFailure::new(CodecCode::WrongPassword, "Wrong password"),
        };
        assert_eq!(error_to_exit_code(&err), ExitCode::WrongPassword);
    }

    #[test]
    fn test_open_failure_is_bad_archive() {
        let err = Error::Open {
            path: "a.zip".into(),
            source: CodecFailure::new(CodecCode::NotZip, "Not a zip archive"),
        };
        assert_eq!(error_to_exit_code(&err), ExitCode::BadArchive);
    }

    #[test]
    fn test_worst_keeps_failure() {
        assert_eq!(
            ExitCode::Success.worst(ExitCode::Warning),
            ExitCode::Warning
        );
        assert_eq!(
            ExitCode::IoError.worst(ExitCode::Warning),
            ExitCode::IoError
        );
        assert_eq!(
            ExitCode::BadArchive.worst(ExitCode::IoError),
            ExitCode::BadArchive
        );
    }
}
