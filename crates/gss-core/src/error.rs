//! Error types and exit code constants for gss.
//!
//! Two kinds of failure exist in the compiler:
//!
//! - **Diagnostics**: per-construct problems found while rewriting the tree
//!   (a malformed `@media`, an orphan `@else`). These never abort anything;
//!   they are collected by an [`ErrorManager`](crate::diagnostics::ErrorManager).
//! - **`GssError`**: failures that stop an operation outright (unreadable
//!   input, a parse that produced no tree, bad options, output I/O).
//!
//! ## Exit Codes
//!
//! - `0`: success
//! - `1`: compilation finished but error diagnostics were recorded
//! - `2`: invalid arguments or configuration
//! - `3`: input not found or unreadable
//! - `4`: parse failure
//! - `10`: internal errors

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Error diagnostics were recorded during compilation.
    CompilationFailed = 1,
    /// Invalid arguments or configuration.
    InvalidArguments = 2,
    /// Input file missing or unreadable.
    InputError = 3,
    /// The input could not be parsed.
    ParseError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Failures that abort a compiler operation.
#[derive(Debug, Error)]
pub enum GssError {
    /// Invalid arguments or options.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be parsed into a tree.
    ///
    /// `rendered` carries the prettified report with the source excerpt.
    #[error("parse error: {message}")]
    Parse { message: String, rendered: String },

    /// Configuration file is not valid JSON for the options type.
    #[error("invalid configuration {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Compilation finished but recorded error diagnostics.
    #[error("compilation failed with {count} error(s)")]
    CompilationFailed { count: usize },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<&GssError> for ErrorCode {
    fn from(err: &GssError) -> Self {
        match err {
            GssError::InvalidArguments { .. } => ErrorCode::InvalidArguments,
            GssError::Config { .. } => ErrorCode::InvalidArguments,
            GssError::InputUnreadable { .. } => ErrorCode::InputError,
            GssError::Parse { .. } => ErrorCode::ParseError,
            GssError::CompilationFailed { .. } => ErrorCode::CompilationFailed,
            GssError::OutputUnwritable { .. } => ErrorCode::InternalError,
            GssError::Internal { .. } => ErrorCode::InternalError,
        }
    }
}

impl GssError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        GssError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        GssError::Internal {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

/// Result alias used across the workspace.
pub type GssResult<T> = Result<T, GssError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_arguments_maps_to_2() {
            let err = GssError::invalid_args("unknown renaming type");
            assert_eq!(err.error_code(), ErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn unreadable_input_maps_to_3() {
            let err = GssError::InputUnreadable {
                path: PathBuf::from("missing.gss"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            };
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn parse_maps_to_4() {
            let err = GssError::Parse {
                message: "unexpected '}'".to_string(),
                rendered: String::new(),
            };
            assert_eq!(err.error_code(), ErrorCode::ParseError);
        }

        #[test]
        fn compilation_failed_maps_to_1() {
            let err = GssError::CompilationFailed { count: 2 };
            assert_eq!(err.error_code().code(), 1);
        }

        #[test]
        fn internal_maps_to_10() {
            assert_eq!(GssError::internal("bug").error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn invalid_arguments_display() {
            let err = GssError::invalid_args("missing input");
            assert_eq!(err.to_string(), "invalid arguments: missing input");
        }

        #[test]
        fn unreadable_input_display() {
            let err = GssError::InputUnreadable {
                path: PathBuf::from("a.gss"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            };
            assert_eq!(err.to_string(), "cannot read a.gss: no such file");
        }

        #[test]
        fn compilation_failed_display() {
            let err = GssError::CompilationFailed { count: 3 };
            assert_eq!(err.to_string(), "compilation failed with 3 error(s)");
        }
    }
}
