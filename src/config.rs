//! Run configuration resolved once from the environment.
//!
//! Components never read process state directly; they receive a [`Config`]
//! by reference.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::PipelineError;
use crate::pipeline::FailurePolicy;
use crate::tracker::TrackerSchema;

/// Default tracker API base URL.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
/// Default branch-name prefix.
pub const DEFAULT_BRANCH_PREFIX: &str = "feature";

const REQUIRED: [&str; 3] = ["NOTION_TOKEN", "NOTION_DATABASE_ID", "GITHUB_REPO"];

/// Everything a pipeline run needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracker integration token.
    pub tracker_token: String,
    /// Tracker database (collection) identifier.
    pub tracker_database_id: String,
    /// Tracker API base URL.
    pub tracker_api_url: String,
    /// Property names and status values of the board.
    pub schema: TrackerSchema,
    /// Hosting repository, e.g. `owner/name`.
    pub repo: String,
    /// Prefix for generated branch names.
    pub branch_prefix: String,
    /// Skip every version-control and hosting side effect.
    pub dry_run: bool,
    /// Block on PR checks after opening the pull request.
    pub wait_for_ci: bool,
    /// Deadline for the checks wait; `None` waits indefinitely.
    pub ci_timeout: Option<Duration>,
    /// Repository root holding the `mocks/` directory.
    pub root: PathBuf,
    /// What to do when one task fails.
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Builds a config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationMissing`] when a required variable
    /// is empty, or [`PipelineError::InvalidConfig`] for unparseable values.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationMissing`] listing every empty
    /// required key, or [`PipelineError::InvalidConfig`] for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let missing: Vec<String> =
            REQUIRED.into_iter().filter(|key| get(*key).is_empty()).map(str::to_string).collect();
        if !missing.is_empty() {
            return Err(PipelineError::ConfigurationMissing { missing });
        }

        let branch_prefix = match get("BRANCH_PREFIX") {
            prefix if prefix.is_empty() => DEFAULT_BRANCH_PREFIX.to_string(),
            prefix => prefix,
        };
        let tracker_api_url = match get("NOTION_API_URL") {
            url if url.is_empty() => DEFAULT_API_URL.to_string(),
            url => url.trim_end_matches('/').to_string(),
        };
        let root = match get("PIPELINE_ROOT") {
            root if root.is_empty() => PathBuf::from("."),
            root => PathBuf::from(root),
        };
        let failure_policy = if get("PIPELINE_ON_ERROR") == "continue" {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::AbortOnError
        };

        Ok(Self {
            tracker_token: get("NOTION_TOKEN"),
            tracker_database_id: get("NOTION_DATABASE_ID"),
            tracker_api_url,
            schema: TrackerSchema::default(),
            repo: get("GITHUB_REPO"),
            branch_prefix,
            dry_run: get("DRY_RUN") == "1",
            wait_for_ci: get("WAIT_FOR_CI") == "1",
            ci_timeout: parse_timeout(&get("CI_TIMEOUT_SECS"))?,
            root,
            failure_policy,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Option<Duration>, PipelineError> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(PipelineError::InvalidConfig {
            key: "CI_TIMEOUT_SECS".to_string(),
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}
