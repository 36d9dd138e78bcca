//! gssc binary entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use gss::cli::{run, Cli, LogLevel};
use gss_core::GssError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_level);

    let result = run(&cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            match &err {
                GssError::Parse { rendered, .. } => {
                    let _ = writeln!(stderr, "{}", rendered);
                }
                // Diagnostics were already rendered by `run`.
                GssError::CompilationFailed { .. } => {
                    let _ = writeln!(stderr, "{}", err);
                }
                _ => {
                    let _ = writeln!(stderr, "error: {}", err);
                }
            }
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
