//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, DEFAULT_BRANCH_PREFIX};

/// Top-level CLI parser for `agent-pipeline`.
#[derive(Debug, Parser)]
#[command(
    name = "agent-pipeline",
    version,
    about = "Drive pending tracker tasks through spec, mock, and pull request"
)]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Log errors only.
    #[arg(short, long, global = true)]
    pub quiet: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every pending task on the board.
    Run(RunArgs),
    /// Check a mock file for the required top-level fields.
    ValidateMock {
        /// Path of the mock JSON file.
        path: PathBuf,
    },
    /// Print the branch name a task would be published on.
    BranchName {
        /// Tracker identifier of the task.
        task_id: String,
        /// Task title.
        title: String,
        /// Branch-name prefix.
        #[arg(long, default_value = DEFAULT_BRANCH_PREFIX)]
        prefix: String,
    },
}

/// Flags for `run` that override the environment.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Skip git and pull-request steps.
    #[arg(long)]
    pub dry_run: bool,
    /// Wait for pull-request checks before marking tasks awaiting test.
    #[arg(long)]
    pub wait_for_ci: bool,
    /// Repository root holding the `mocks/` directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl RunArgs {
    /// Layers the flags over an environment-derived config.
    ///
    /// Flags only switch behaviour on; an absent flag keeps the env value.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        config.dry_run |= self.dry_run;
        config.wait_for_ci |= self.wait_for_ci;
        if let Some(root) = &self.root {
            config.root.clone_from(root);
        }
        config
    }
}
