//! Recording adapter for the `SourceControl` port.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{PullRequest, SourceControl};

/// Records source-control interactions while delegating to an inner implementation.
pub struct RecordingSourceControl {
    inner: Box<dyn SourceControl>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSourceControl {
    /// Creates a recording adapter wrapping the given implementation.
    pub fn new(inner: Box<dyn SourceControl>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct BranchInput<'a> {
    branch: &'a str,
}

#[derive(Serialize)]
struct CommitInput<'a> {
    path: String,
    message: &'a str,
}

#[derive(Serialize)]
struct ChecksInput<'a> {
    pr_url: &'a str,
    timeout_secs: Option<u64>,
}

impl SourceControl for RecordingSourceControl {
    fn branch_and_checkout(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.branch_and_checkout(branch);
        record_result(&self.recorder, "vcs", "branch_and_checkout", &BranchInput { branch }, &result);
        result
    }

    fn stage_and_commit(
        &self,
        path: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.stage_and_commit(path, message);
        let input = CommitInput { path: path.display().to_string(), message };
        record_result(&self.recorder, "vcs", "stage_and_commit", &input, &result);
        result
    }

    fn push(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.push(branch);
        record_result(&self.recorder, "vcs", "push", &BranchInput { branch }, &result);
        result
    }

    fn create_pull_request(
        &self,
        request: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.create_pull_request(request);
        record_result(&self.recorder, "vcs", "create_pull_request", request, &result);
        result
    }

    fn watch_checks(
        &self,
        pr_url: &str,
        timeout: Option<Duration>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.watch_checks(pr_url, timeout);
        let input = ChecksInput { pr_url, timeout_secs: timeout.map(|t| t.as_secs()) };
        record_result(&self.recorder, "vcs", "watch_checks", &input, &result);
        result
    }
}
