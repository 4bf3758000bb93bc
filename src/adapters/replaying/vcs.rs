//! Replaying adapter for the `SourceControl` port.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{PullRequest, SourceControl};

/// Replays recorded source-control results from a cassette.
pub struct ReplayingSourceControl {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingSourceControl {
    /// Creates a replaying adapter from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        extract_result(&next_output(&self.replayer, "vcs", method), &format!("vcs::{method}"))
    }
}

impl SourceControl for ReplayingSourceControl {
    fn branch_and_checkout(&self, _branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("branch_and_checkout")
    }

    fn stage_and_commit(
        &self,
        _path: &Path,
        _message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("stage_and_commit")
    }

    fn push(&self, _branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("push")
    }

    fn create_pull_request(
        &self,
        _request: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.replay("create_pull_request")
    }

    fn watch_checks(
        &self,
        _pr_url: &str,
        _timeout: Option<Duration>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.replay("watch_checks")
    }
}
