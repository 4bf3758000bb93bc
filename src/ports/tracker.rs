//! Task tracker port for reading pending work and writing status back.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`TaskTracker`] to keep the trait dyn-compatible.
pub type TrackerFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A work item read from the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque tracker identifier (a page id).
    pub id: String,
    /// Task title; `"Untitled"` when the tracker has none.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// The accumulated acceptance document.
    pub acceptance: String,
}

/// Workflow states this pipeline reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting to be picked up; the query filter.
    Pending,
    /// Spec written, work started.
    InProgress,
    /// Pull request open, waiting for testing.
    AwaitingTest,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::AwaitingTest => "awaiting-test",
        };
        f.write_str(name)
    }
}

/// Reads and updates tasks in an external tracker.
///
/// Abstracting the tracker allows deterministic replay and testing
/// without touching a real tracker API.
pub trait TaskTracker: Send + Sync {
    /// Returns every task currently in the pending state, in tracker order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>>;

    /// Overwrites a task's acceptance text and status in one update call.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the update.
    fn update_task<'a>(
        &'a self,
        task_id: &'a str,
        acceptance: &'a str,
        status: TaskStatus,
    ) -> TrackerFuture<'a, ()>;
}
