//! Command dispatch and handlers.

pub mod branch_name;
pub mod run;
pub mod validate_mock;

use std::env;
use std::path::PathBuf;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PipelineError;

/// Dispatch a parsed command to its handler.
///
/// When `PIPELINE_RECORD` is set to a directory path, all port interactions
/// of `run` are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns the selected handler's error, or a configuration error before any
/// work starts.
pub fn dispatch(command: &Command) -> Result<(), PipelineError> {
    match command {
        Command::Run(args) => {
            let config = args.apply(Config::from_env()?);
            with_context(&config, |ctx| run::run(ctx, &config))
        }
        Command::ValidateMock { path } => validate_mock::run(&LiveFileSystem, path),
        Command::BranchName { task_id, title, prefix } => {
            branch_name::run(prefix, task_id, title);
            Ok(())
        }
    }
}

/// Builds the live (or recording) context and hands it to `handler`.
fn with_context<F>(config: &Config, handler: F) -> Result<(), PipelineError>
where
    F: FnOnce(&ServiceContext) -> Result<(), PipelineError>,
{
    let Ok(path) = env::var("PIPELINE_RECORD") else {
        return handler(&ServiceContext::live(config)?);
    };

    let (ctx, session) = ServiceContext::recording_at(config, &PathBuf::from(path))?;
    let result = handler(&ctx);

    // Finish recording after the command completes, even on error.
    // The context holds the recorder handles and must go first.
    drop(ctx);
    finish_recording(session)?;
    result
}

/// Finish a recording session and report the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), PipelineError> {
    let output_dir = session.finish().map_err(PipelineError::Recording)?;
    tracing::info!(dir = %output_dir.display(), "recording saved");
    Ok(())
}
