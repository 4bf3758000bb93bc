//! Core library entry for the `agent-pipeline` CLI.
//!
//! Pulls pending tasks from a tracker board, writes a spec and a mock for
//! each, publishes the mock on a branch with a pull request, and records the
//! results back on the task.

pub mod adapters;
pub mod branch;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod ports;
pub mod tracker;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::PipelineError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "PIPELINE_LOG";

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`PipelineError::Usage`] when argument parsing fails, or the
/// command's own error.
pub fn run<I, T>(args: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(PipelineError::Usage(err.to_string())),
    };
    init_tracing(cli.quiet, cli.verbose);
    commands::dispatch(&cli.command)
}

/// Installs the stderr log subscriber. A subscriber already set (by a test
/// harness or an embedding program) is left in place.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
