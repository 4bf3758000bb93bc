//! Recording adapter for the `TaskTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Task, TaskStatus, TaskTracker, TrackerFuture};

/// Records tracker interactions while delegating to an inner implementation.
pub struct RecordingTaskTracker {
    inner: Box<dyn TaskTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskTracker {
    /// Creates a recording tracker wrapping the given implementation.
    pub fn new(inner: Box<dyn TaskTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct UpdateInput<'a> {
    task_id: &'a str,
    acceptance: &'a str,
    status: TaskStatus,
}

impl TaskTracker for RecordingTaskTracker {
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let result = self.inner.query_pending().await;
            record_result(&self.recorder, "tracker", "query_pending", &(), &result);
            result
        })
    }

    fn update_task<'a>(
        &'a self,
        task_id: &'a str,
        acceptance: &'a str,
        status: TaskStatus,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.update_task(task_id, acceptance, status).await;
            let input = UpdateInput { task_id, acceptance, status };
            record_result(&self.recorder, "tracker", "update_task", &input, &result);
            result
        })
    }
}
