//! Binary entrypoint for the `agent-pipeline` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Values already in the environment take precedence over `.env`.
    dotenvy::dotenv().ok();

    // Recording is handled in commands::dispatch via PIPELINE_RECORD=<dir>.
    match agent_pipeline::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
