//! Exit codes for the CLI tool.

use ziped::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// External convert command failed
pub const COMMAND_ERROR: i32 = 4;
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
    FatalError,
    BadArchive,
    CommandError,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::CommandError => COMMAND_ERROR,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a ziped error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::OutputExists { .. } => ExitCode::IoError,
        Error::Container(_) => ExitCode::BadArchive,
        Error::InvalidPattern { .. }
        | Error::InvalidRegex { .. }
        | Error::SelectorRequired
        | Error::MissingParameter { .. }
        | Error::InvalidEncoding { .. }
        | Error::CommandSyntax(_) => ExitCode::BadArgs,
        Error::CommandSpawn { .. } | Error::CommandFailed { .. } => ExitCode::CommandError,
        Error::EntryNotFound { .. } | Error::EntryExists { .. } => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
