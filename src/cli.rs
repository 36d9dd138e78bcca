//! Command-line front door for `gssc`.
//!
//! [`Cli`] is the clap definition; [`run`] executes one invocation against
//! explicit output streams so it can be driven from tests. Options come from
//! `--config` when given, then the flags on the command line are applied on
//! top.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gss_core::{BasicErrorManager, ErrorManager, GssError, GssResult};
use tracing::debug;

use crate::compiler::compile_files;
use crate::options::{CompileOptions, OutputFormat, RenamingType};

/// Compile GSS stylesheets into CSS.
#[derive(Debug, Parser)]
#[command(name = "gssc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input files, compiled together in order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the CSS here instead of stdout.
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Indented output instead of compressed.
    #[arg(long)]
    pub pretty_print: bool,

    /// Condition name that holds in `@if` blocks. Can be repeated.
    #[arg(long = "define", value_name = "COND")]
    pub defines: Vec<String>,

    /// How class names are renamed.
    #[arg(long, value_enum)]
    pub rename: Option<RenamingType>,

    /// Class names never renamed, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub excluded_classes: Vec<String>,

    /// Write the class renaming table here as JSON.
    #[arg(long, value_name = "PATH")]
    pub output_renaming_map: Option<PathBuf>,

    /// Accept at-rules the compiler does not know.
    #[arg(long)]
    pub allow_unrecognized_at_rules: bool,

    /// JSON file with compile options; flags override it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Cli {
    /// The options file (if any) with the command-line flags applied.
    pub fn compile_options(&self) -> GssResult<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => CompileOptions::from_json_file(path)?,
            None => CompileOptions::default(),
        };
        if self.pretty_print {
            options.output_format = OutputFormat::Pretty;
        }
        options.true_conditions.extend(self.defines.iter().cloned());
        if let Some(rename) = self.rename {
            options.rename = rename;
        }
        options
            .excluded_classes
            .extend(self.excluded_classes.iter().cloned());
        if self.allow_unrecognized_at_rules {
            options.allow_unrecognized_at_rules = true;
        }
        Ok(options)
    }
}

/// Execute one invocation.
///
/// CSS goes to `--output-file` or `stdout`; diagnostics are rendered to
/// `stderr`. Recorded errors turn into [`GssError::CompilationFailed`] after
/// everything has been written.
pub fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> GssResult<()> {
    let options = cli.compile_options()?;
    debug!(?options, inputs = cli.inputs.len(), "gssc");

    let mut errors = BasicErrorManager::new();
    let output = compile_files(&cli.inputs, &options, &mut errors)?;

    if !errors.diagnostics().is_empty() {
        writeln!(stderr, "{}", errors.render_all())
            .map_err(|e| GssError::internal(format!("cannot write diagnostics: {}", e)))?;
    }
    if errors.has_errors() {
        return Err(GssError::CompilationFailed {
            count: errors.error_count(),
        });
    }

    match &cli.output_file {
        Some(path) => write_file(path, &output.css)?,
        None => {
            write!(stdout, "{}", output.css)
                .and_then(|_| stdout.flush())
                .map_err(|e| GssError::internal(format!("cannot write to stdout: {}", e)))?;
        }
    }

    if let Some(path) = &cli.output_renaming_map {
        let map = output.renaming_map.unwrap_or_default();
        let json = serde_json::to_string_pretty(&map)
            .map_err(|e| GssError::internal(format!("cannot serialize renaming map: {}", e)))?;
        write_file(path, &format!("{}\n", json))?;
    }
    Ok(())
}

fn write_file(path: &std::path::Path, contents: &str) -> GssResult<()> {
    std::fs::write(path, contents).map_err(|source| GssError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn inputs_are_required() {
            assert!(Cli::try_parse_from(["gssc"]).is_err());
        }

        #[test]
        fn defaults() {
            let cli = Cli::try_parse_from(["gssc", "a.gss", "b.gss"]).unwrap();
            assert_eq!(cli.inputs, vec![PathBuf::from("a.gss"), PathBuf::from("b.gss")]);
            assert!(!cli.pretty_print);
            assert_eq!(cli.rename, None);
            assert_eq!(cli.log_level, LogLevel::Warn);
            assert_eq!(cli.compile_options().unwrap(), CompileOptions::default());
        }

        #[test]
        fn repeated_defines_and_class_list() {
            let cli = Cli::try_parse_from([
                "gssc",
                "--define",
                "IE",
                "--define",
                "MOBILE",
                "--excluded-classes",
                "a,b",
                "--rename",
                "closure",
                "in.gss",
            ])
            .unwrap();
            let options = cli.compile_options().unwrap();
            assert_eq!(options.true_conditions, vec!["IE", "MOBILE"]);
            assert_eq!(options.excluded_classes, vec!["a", "b"]);
            assert_eq!(options.rename, RenamingType::Closure);
        }

        #[test]
        fn output_flags() {
            let cli = Cli::try_parse_from([
                "gssc",
                "-o",
                "out.css",
                "--pretty-print",
                "--allow-unrecognized-at-rules",
                "--log-level",
                "debug",
                "in.gss",
            ])
            .unwrap();
            assert_eq!(cli.output_file, Some(PathBuf::from("out.css")));
            assert_eq!(cli.log_level, LogLevel::Debug);
            let options = cli.compile_options().unwrap();
            assert_eq!(options.output_format, OutputFormat::Pretty);
            assert!(options.allow_unrecognized_at_rules);
        }

        #[test]
        fn unknown_rename_is_rejected() {
            assert!(Cli::try_parse_from(["gssc", "--rename", "short", "in.gss"]).is_err());
        }
    }
}
