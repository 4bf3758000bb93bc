//! Replaying adapter for the `TaskTracker` port.

use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Task, TaskStatus, TaskTracker, TrackerFuture};

/// Serves recorded tracker results from a cassette.
pub struct ReplayingTaskTracker {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskTracker {
    /// Creates a replaying tracker from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl TaskTracker for ReplayingTaskTracker {
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>> {
        let output = next_output(&self.replayer, "tracker", "query_pending");
        Box::pin(async move { extract_result(&output, "tracker::query_pending") })
    }

    fn update_task<'a>(
        &'a self,
        _task_id: &'a str,
        _acceptance: &'a str,
        _status: TaskStatus,
    ) -> TrackerFuture<'a, ()> {
        let output = next_output(&self.replayer, "tracker", "update_task");
        Box::pin(async move { extract_result(&output, "tracker::update_task") })
    }
}
