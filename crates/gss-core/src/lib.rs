//! Core infrastructure for gss.
//!
//! This crate holds everything that does not need to know about the tree:
//! - Source buffers and locations
//! - Diagnostics and the error manager passes report to
//! - The error type and process exit codes
//! - Text position utilities
//! - Substitution maps for class renaming

pub mod diagnostics;
pub mod error;
pub mod location;
pub mod substitution;
pub mod text;

pub use diagnostics::{BasicErrorManager, ErrorManager, GssDiagnostic, Severity};
pub use error::{ErrorCode, GssError, GssResult};
pub use location::{SourceCode, SourceLocation, SourcePoint};
