//! gss: a compiler for GSS stylesheets.
//!
//! GSS is CSS plus `@def` constants, `@if`/`@elseif`/`@else` conditional
//! blocks and class renaming. This crate ties the workspace together:
//!
//! - [`compile`] parses the inputs, runs every pass and prints the result
//! - [`CompileOptions`] selects conditions, renaming and output format
//! - [`cli`] is the `gssc` command-line front door
//!
//! The tree, parser and passes live in `gss_cst`; locations, diagnostics
//! and errors live in `gss_core`.
//!
//! ```
//! use gss::{compile, CompileOptions};
//! use gss_core::{BasicErrorManager, ErrorManager, SourceCode};
//!
//! let source = SourceCode::shared("menu.gss", "@def BG #fff; .menu { background: BG }");
//! let mut errors = BasicErrorManager::new();
//! let output = compile(&[source], &CompileOptions::default(), &mut errors).unwrap();
//! assert!(!errors.has_errors());
//! assert_eq!(output.css, ".menu{background:#fff}");
//! ```

pub mod cli;
pub mod compiler;
pub mod options;

pub use compiler::{compile, compile_files, read_source, CompileOutput};
pub use options::{CompileOptions, OutputFormat, RenamingType};
