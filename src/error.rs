//! Error types for batch archive editing.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of the batch-edit engine, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Categories
//!
//! Configuration errors are detected before any archive file is opened and
//! abort the whole invocation. Per-file errors abort only the transaction for
//! that file and leave the source untouched.
//!
//! | Category | Variants | Typical Cause |
//! |----------|----------|---------------|
//! | Configuration | [`InvalidPattern`][Error::InvalidPattern], [`InvalidRegex`][Error::InvalidRegex], [`SelectorRequired`][Error::SelectorRequired], [`MissingParameter`][Error::MissingParameter], [`InvalidEncoding`][Error::InvalidEncoding] | Bad command-line selectors or options |
//! | Per-file I/O | [`Io`][Error::Io], [`Container`][Error::Container], [`OutputExists`][Error::OutputExists] | File system or archive format problems |
//! | Entry | [`EntryNotFound`][Error::EntryNotFound], [`EntryExists`][Error::EntryExists] | Mutating a missing entry, rename collisions |
//! | Process | [`CommandSyntax`][Error::CommandSyntax], [`CommandSpawn`][Error::CommandSpawn], [`CommandFailed`][Error::CommandFailed] | The external convert command |
//!
//! # Example
//!
//! ```rust,no_run
//! use ziped::Error;
//!
//! fn describe(error: &Error) {
//!     match error {
//!         Error::Io(e) => eprintln!("file error: {}", e),
//!         Error::OutputExists { path } => eprintln!("refusing to overwrite {}", path),
//!         Error::CommandFailed { command, .. } => eprintln!("{} failed", command),
//!         other => eprintln!("{}", other),
//!     }
//! }
//! ```

use std::io;

/// A specialized `Result` type for batch archive editing.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for batch archive editing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// Returned when opening, serializing, or atomically replacing an archive
    /// file fails. The source file is guaranteed to be unmodified.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive container could not be parsed or serialized.
    ///
    /// The container format itself is handled by the `zip` crate; this variant
    /// wraps its errors.
    #[error("Archive error: {0}")]
    Container(#[from] zip::result::ZipError),

    /// The wildcard selector pattern is not valid.
    ///
    /// Detected before any file is opened.
    #[error("Invalid wildcard pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The regular-expression selector is not valid.
    ///
    /// Detected before any file is opened.
    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex {
        /// The offending expression.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The operation requires an explicit entry selector.
    ///
    /// Unconditional removal is refused; `rm` without `--filter` or `--regexp`
    /// fails with this error instead of removing every entry.
    #[error("File name pattern is required")]
    SelectorRequired,

    /// A required operation parameter is missing.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// The parameter name, e.g. `cmd`.
        name: &'static str,
    },

    /// The configured path-encoding label is not recognized.
    #[error("Invalid path encoding '{label}'")]
    InvalidEncoding {
        /// The unrecognized encoding label.
        label: String,
    },

    /// The explicit output path already exists.
    ///
    /// Explicit outputs are created exclusively; an unrelated file is never
    /// silently overwritten.
    #[error("Output file '{path}' already exists")]
    OutputExists {
        /// The conflicting path.
        path: String,
    },

    /// The named entry does not exist in the archive.
    #[error("Entry not found: {path}")]
    EntryNotFound {
        /// The missing entry name.
        path: String,
    },

    /// An entry with the target name already exists.
    ///
    /// Returned when a rename would collide with another entry; the whole
    /// transaction is rejected rather than producing duplicate names.
    #[error("Entry already exists: {path}")]
    EntryExists {
        /// The conflicting entry name.
        path: String,
    },

    /// The convert command line could not be tokenized.
    #[error("Invalid command line: {0}")]
    CommandSyntax(String),

    /// The external convert command could not be started.
    #[error("Failed to spawn '{command}': {source}")]
    CommandSpawn {
        /// The command that failed to start.
        command: String,
        /// The underlying spawn error.
        source: io::Error,
    },

    /// The external convert command exited with a non-zero status.
    #[error("Command '{command}' failed with {status}")]
    CommandFailed {
        /// The command that failed.
        command: String,
        /// The captured exit status.
        status: std::process::ExitStatus,
    },
}

impl Error {
    /// Returns whether this error is a configuration error.
    ///
    /// Configuration errors are detected before any archive file is touched
    /// and abort the whole invocation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidPattern { .. }
                | Error::InvalidRegex { .. }
                | Error::SelectorRequired
                | Error::MissingParameter { .. }
                | Error::InvalidEncoding { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::SelectorRequired.is_configuration());
        assert!(
            Error::InvalidRegex {
                pattern: "(".into(),
                reason: "unclosed group".into(),
            }
            .is_configuration()
        );
        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).is_configuration());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::OutputExists {
            path: "out.zip".into(),
        };
        assert_eq!(err.to_string(), "Output file 'out.zip' already exists");
        assert_eq!(
            Error::SelectorRequired.to_string(),
            "File name pattern is required"
        );
    }
}
