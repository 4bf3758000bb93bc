//! Source-control port for branch, commit, push, and pull-request operations.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A pull request to open on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR title.
    pub title: String,
    /// PR body (markdown).
    pub body: String,
    /// Hosting repository, e.g. `owner/name`.
    pub repo: String,
}

/// Publishes work through version control and a code-hosting service.
///
/// Each operation maps to one external command so the orchestrator does not
/// depend on any particular platform's syntax.
pub trait SourceControl: Send + Sync {
    /// Creates a new branch and checks it out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch already exists or checkout fails.
    fn branch_and_checkout(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Stages `path` (relative to the repository root) and commits it.
    ///
    /// # Errors
    ///
    /// Returns an error if staging fails or there is nothing to commit.
    fn stage_and_commit(
        &self,
        path: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Pushes `branch` to the remote with upstream tracking.
    ///
    /// # Errors
    ///
    /// Returns an error if the push is rejected.
    fn push(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Opens a pull request and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the hosting service refuses the request.
    fn create_pull_request(
        &self,
        request: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Blocks until the PR's checks complete and returns the summary text.
    ///
    /// `None` waits without a deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the checks fail, or the deadline passes first.
    fn watch_checks(
        &self,
        pr_url: &str,
        timeout: Option<Duration>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
