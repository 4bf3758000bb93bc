//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline core and an
//! external system (filesystem, task tracker, source control).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod tracker;
pub mod vcs;

pub use filesystem::FileSystem;
pub use tracker::{Task, TaskStatus, TaskTracker, TrackerFuture};
pub use vcs::{PullRequest, SourceControl};
