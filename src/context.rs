//! Service context bundling all port trait objects.

use std::path::Path;
use std::time::Duration;

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::tracker::LiveTaskTracker;
use crate::adapters::live::vcs::LiveSourceControl;
use crate::adapters::recording::{RecordingFileSystem, RecordingSourceControl, RecordingTaskTracker};
use crate::adapters::replaying::{ReplayingFileSystem, ReplayingSourceControl, ReplayingTaskTracker};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::error::PipelineError;
use crate::ports::{FileSystem, PullRequest, SourceControl, Task, TaskStatus, TaskTracker, TrackerFuture};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Filesystem for mock artifacts.
    pub fs: Box<dyn FileSystem>,
    /// Task tracker holding the board.
    pub tracker: Box<dyn TaskTracker>,
    /// Version control and code hosting.
    pub vcs: Box<dyn SourceControl>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, PipelineError> {
        Ok(Self {
            fs: Box::new(LiveFileSystem),
            tracker: Box::new(LiveTaskTracker::new(config)?),
            vcs: Box::new(LiveSourceControl::new(config.root.clone())),
        })
    }

    /// Creates a live context whose every port call is captured into
    /// per-port cassettes under `dir`.
    ///
    /// This is the developer-only mechanism behind `PIPELINE_RECORD`. The
    /// context must be dropped before [`RecordingSession::finish`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be prepared or the
    /// live adapters cannot be built.
    pub fn recording_at(config: &Config, dir: &Path) -> Result<(Self, RecordingSession), PipelineError> {
        let session = RecordingSession::new(dir).map_err(PipelineError::Recording)?;
        let live = Self::live(config)?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(live.fs, session.fs.clone())),
            tracker: Box::new(RecordingTaskTracker::new(live.tracker, session.tracker.clone())),
            vcs: Box::new(RecordingSourceControl::new(live.vcs, session.vcs.clone())),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer over the same cassette, so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        Ok(Self {
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            tracker: Box::new(ReplayingTaskTracker::new(CassetteReplayer::new(&cassette))),
            vcs: Box::new(ReplayingSourceControl::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette file use a panicking adapter that
    /// fails with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            tracker: match replayers.tracker {
                Some(r) => Box::new(ReplayingTaskTracker::new(r)),
                None => Box::new(PanickingTaskTracker),
            },
            vcs: match replayers.vcs {
                Some(r) => Box::new(ReplayingSourceControl::new(r)),
                None => Box::new(PanickingSourceControl),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded for it");
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
    fn exists(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
    fn create_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
}

struct PanickingTaskTracker;
impl TaskTracker for PanickingTaskTracker {
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>> {
        unconfigured("tracker")
    }
    fn update_task<'a>(
        &'a self,
        _task_id: &'a str,
        _acceptance: &'a str,
        _status: TaskStatus,
    ) -> TrackerFuture<'a, ()> {
        unconfigured("tracker")
    }
}

struct PanickingSourceControl;
impl SourceControl for PanickingSourceControl {
    fn branch_and_checkout(&self, _branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("vcs")
    }
    fn stage_and_commit(
        &self,
        _path: &Path,
        _message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("vcs")
    }
    fn push(&self, _branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("vcs")
    }
    fn create_pull_request(
        &self,
        _request: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("vcs")
    }
    fn watch_checks(
        &self,
        _pr_url: &str,
        _timeout: Option<Duration>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("vcs")
    }
}
