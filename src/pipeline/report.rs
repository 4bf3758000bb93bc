//! Per-run outcome report.

use std::path::PathBuf;

use crate::branch::BranchName;

/// What happened to one task during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The mock was written and validated; publishing was skipped.
    DryRun {
        /// Path of the validated mock file.
        mock_path: PathBuf,
    },
    /// The mock was pushed and a pull request opened.
    Published {
        /// Branch holding the mock commit.
        branch: BranchName,
        /// URL of the opened pull request.
        pr_url: String,
        /// Checks summary when the run waited for CI.
        checks: Option<String>,
    },
    /// A step failed and the run continued with the next task.
    Failed {
        /// Rendered error message.
        error: String,
    },
}

/// Outcome of one task, keyed by its tracker identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Tracker identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// What happened.
    pub outcome: TaskOutcome,
}

/// Outcomes of every task processed in one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Pending status value the run queried for.
    pub pending_status: String,
    /// One entry per task attempted.
    pub outcomes: Vec<TaskReport>,
}

impl RunReport {
    /// Creates an empty report for a query on `pending_status`.
    #[must_use]
    pub fn new(pending_status: impl Into<String>) -> Self {
        Self { pending_status: pending_status.into(), outcomes: Vec::new() }
    }

    /// Returns `true` if no task was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of tasks that ended in [`TaskOutcome::Failed`].
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|r| matches!(r.outcome, TaskOutcome::Failed { .. })).count()
    }

    /// Renders a human-readable summary, one line per task.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.outcomes.is_empty() {
            return format!("No tasks in status={}", self.pending_status);
        }

        let mut out = String::new();
        for report in &self.outcomes {
            let line = match &report.outcome {
                TaskOutcome::DryRun { mock_path } => format!(
                    "[dry-run] {}: mock {} (git/gh skipped)",
                    report.title,
                    mock_path.display()
                ),
                TaskOutcome::Published { branch, pr_url, checks } => {
                    let ci = if checks.is_some() { ", checks recorded" } else { "" };
                    format!("[published] {}: {pr_url} on {branch}{ci}", report.title)
                }
                TaskOutcome::Failed { error } => format!("[failed] {}: {error}", report.title),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!(
            "{} task(s) processed, {} failed",
            self.outcomes.len(),
            self.failures()
        ));
        out
    }
}
