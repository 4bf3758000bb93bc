//! Lifecycle orchestrator driving each pending task from spec to pull request.
//!
//! Per task, in order: write the spec and mark the task in progress, ensure
//! and validate its mock, then (unless dry-run) branch, commit, push, open a
//! pull request, optionally wait for checks, and mark the task awaiting test.
//! Tasks run strictly one after another in tracker order.

pub mod report;

pub use report::{RunReport, TaskOutcome, TaskReport};

use std::path::Path;

use tracing::{info, warn};

use crate::branch::BranchName;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::document::{self, PR_SECTION, SPEC_SECTION, TEST_REPORT_SECTION};
use crate::error::{PipelineError, TrackerError};
use crate::mock::{self, MOCKS_DIR};
use crate::ports::{PullRequest, Task, TaskStatus};

/// What the task loop does when one task fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and return the first error.
    #[default]
    AbortOnError,
    /// Record the failure and move on to the next task.
    ContinueOnError,
}

/// Drives pending tasks through the lifecycle using the context's ports.
pub struct Orchestrator<'a> {
    ctx: &'a ServiceContext,
    config: &'a Config,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator over the given ports and configuration.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a Config) -> Self {
        Self { ctx, config }
    }

    /// Fetches the pending tasks and processes each in tracker order.
    ///
    /// An empty queue is a successful run with an empty report.
    ///
    /// # Errors
    ///
    /// Returns the query failure, or under [`FailurePolicy::AbortOnError`]
    /// the first task failure. Tasks after the failing one are not touched.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let pending = self.config.schema.status_value(TaskStatus::Pending);
        let tasks = self.ctx.tracker.query_pending().await.map_err(tracker_error)?;
        let mut report = RunReport::new(pending);

        if tasks.is_empty() {
            info!(status = pending, "no pending tasks");
            return Ok(report);
        }
        info!(count = tasks.len(), "fetched pending tasks");

        for task in &tasks {
            let outcome = match self.process_task(task).await {
                Ok(outcome) => outcome,
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::AbortOnError => return Err(err),
                    FailurePolicy::ContinueOnError => {
                        warn!(task_id = %task.id, error = %err, "task failed, continuing");
                        TaskOutcome::Failed { error: err.to_string() }
                    }
                },
            };
            report.outcomes.push(TaskReport {
                task_id: task.id.clone(),
                title: task.title.clone(),
                outcome,
            });
        }
        Ok(report)
    }

    /// Runs the lifecycle for one task.
    ///
    /// The in-progress write happens before any filesystem or version-control
    /// work, so a later failure leaves the task marked in progress.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. Nothing is rolled back.
    pub async fn process_task(&self, task: &Task) -> Result<TaskOutcome, PipelineError> {
        let spec = document::build_spec(task);
        let acceptance = document::append_section(&task.acceptance, SPEC_SECTION, &spec);
        info!(task_id = %task.id, title = %task.title, "marking task in progress");
        self.ctx
            .tracker
            .update_task(&task.id, &acceptance, TaskStatus::InProgress)
            .await
            .map_err(tracker_error)?;

        let mock_path = mock::ensure_mock(self.ctx.fs.as_ref(), task, &self.config.root)?;
        mock::validate_mock(self.ctx.fs.as_ref(), &mock_path)?;
        info!(path = %mock_path.display(), "mock validated");

        if self.config.dry_run {
            info!(task_id = %task.id, "dry run, skipping git and pull request");
            return Ok(TaskOutcome::DryRun { mock_path });
        }

        let branch = BranchName::for_task(&self.config.branch_prefix, task);
        self.publish_mock(task, &branch)?;

        let request = PullRequest {
            title: task.title.clone(),
            body: document::pr_body(),
            repo: self.config.repo.clone(),
        };
        let pr_url =
            self.ctx.vcs.create_pull_request(&request).map_err(vcs_error("create pull request"))?;
        info!(%pr_url, "pull request opened");

        let mut acceptance = document::append_section(&acceptance, PR_SECTION, &pr_url);
        let checks = if self.config.wait_for_ci {
            info!(%pr_url, timeout = ?self.config.ci_timeout, "waiting for checks");
            let summary = self
                .ctx
                .vcs
                .watch_checks(&pr_url, self.config.ci_timeout)
                .map_err(vcs_error("watch checks"))?;
            acceptance = document::append_section(&acceptance, TEST_REPORT_SECTION, &summary);
            Some(summary)
        } else {
            None
        };

        self.ctx
            .tracker
            .update_task(&task.id, &acceptance, TaskStatus::AwaitingTest)
            .await
            .map_err(tracker_error)?;
        info!(task_id = %task.id, "task awaiting test");

        Ok(TaskOutcome::Published { branch, pr_url, checks })
    }

    /// Creates the branch, commits the mocks directory, and pushes it.
    fn publish_mock(&self, task: &Task, branch: &BranchName) -> Result<(), PipelineError> {
        let vcs = &self.ctx.vcs;
        info!(%branch, "publishing mock");
        vcs.branch_and_checkout(branch.as_str()).map_err(vcs_error("checkout"))?;
        vcs.stage_and_commit(Path::new(MOCKS_DIR), &document::commit_message(task))
            .map_err(vcs_error("commit"))?;
        vcs.push(branch.as_str()).map_err(vcs_error("push"))
    }
}

/// Recovers a typed tracker error from the port's boxed error.
fn tracker_error(err: Box<dyn std::error::Error + Send + Sync>) -> PipelineError {
    match err.downcast::<TrackerError>() {
        Ok(typed) => PipelineError::Tracker(*typed),
        Err(other) => PipelineError::Tracker(TrackerError::Http(other.to_string())),
    }
}

fn vcs_error(
    step: &'static str,
) -> impl FnOnce(Box<dyn std::error::Error + Send + Sync>) -> PipelineError {
    move |err| PipelineError::SourceControl { step, message: err.to_string() }
}
