//! Tracker data model and the property schema used to read and write tasks.
//!
//! The tracker exposes each task as a page whose properties are tagged by
//! kind (`title`, `rich_text`, `status`, ...). [`schema`] decodes those
//! pages at a single boundary; [`TrackerSchema`] names which properties and
//! status values this workflow uses.

pub mod schema;

use crate::ports::TaskStatus;

/// Property names and status values of the tracker board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSchema {
    /// Status-typed property used for filtering and transitions.
    pub status_property: String,
    /// Title-typed property holding the task title.
    pub title_property: String,
    /// Rich-text property holding the description.
    pub description_property: String,
    /// Rich-text property holding the acceptance document.
    pub acceptance_property: String,
    /// Status value for [`TaskStatus::Pending`].
    pub pending: String,
    /// Status value for [`TaskStatus::InProgress`].
    pub in_progress: String,
    /// Status value for [`TaskStatus::AwaitingTest`].
    pub awaiting_test: String,
}

impl TrackerSchema {
    /// Returns the board's name for a workflow status.
    #[must_use]
    pub fn status_value(&self, status: TaskStatus) -> &str {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::AwaitingTest => &self.awaiting_test,
        }
    }
}

impl Default for TrackerSchema {
    fn default() -> Self {
        Self {
            status_property: "状态".to_string(),
            title_property: "标题".to_string(),
            description_property: "描述/复现步骤".to_string(),
            acceptance_property: "验收标准/解决方案".to_string(),
            pending: "待处理".to_string(),
            in_progress: "进行中".to_string(),
            awaiting_test: "待测试".to_string(),
        }
    }
}
