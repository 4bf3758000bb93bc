//! In-memory port fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_pipeline::config::Config;
use agent_pipeline::context::ServiceContext;
use agent_pipeline::ports::{
    FileSystem, PullRequest, SourceControl, Task, TaskStatus, TaskTracker, TrackerFuture,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Repository root the fakes pretend to live in.
pub const ROOT: &str = "/repo";

/// One recorded `update_task` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub task_id: String,
    pub acceptance: String,
    pub status: TaskStatus,
}

/// Handles onto the fakes' shared state, kept by the test after the
/// context takes ownership of the adapters.
#[derive(Clone, Default)]
pub struct Fakes {
    pub files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    pub updates: Arc<Mutex<Vec<Update>>>,
    pub vcs_calls: Arc<Mutex<Vec<String>>>,
}

impl Fakes {
    pub fn updates(&self) -> Vec<Update> {
        self.updates.lock().unwrap().clone()
    }

    pub fn vcs_calls(&self) -> Vec<String> {
        self.vcs_calls.lock().unwrap().clone()
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn seed_file(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
    }
}

/// Builds a context over fresh fakes serving `tasks` as the pending queue.
pub fn context(tasks: Vec<Task>) -> (ServiceContext, Fakes) {
    let fakes = Fakes::default();
    let ctx = ServiceContext {
        fs: Box::new(MemFs { files: fakes.files.clone() }),
        tracker: Box::new(FakeTracker::new(tasks, fakes.updates.clone())),
        vcs: Box::new(FakeVcs::new(fakes.vcs_calls.clone())),
    };
    (ctx, fakes)
}

/// Config with the required values set and every optional value defaulted.
pub fn config() -> Config {
    let mut config = Config::from_lookup(|key| match key {
        "NOTION_TOKEN" => Some("secret".to_string()),
        "NOTION_DATABASE_ID" => Some("db1".to_string()),
        "GITHUB_REPO" => Some("acme/app".to_string()),
        _ => None,
    })
    .unwrap();
    config.root = PathBuf::from(ROOT);
    config
}

pub fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        acceptance: String::new(),
    }
}

/// Filesystem held in a map; directories are implicit.
pub struct MemFs {
    pub files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, BoxError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("{} not found", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), BoxError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Tracker serving a fixed queue and logging every update.
pub struct FakeTracker {
    tasks: Vec<Task>,
    updates: Arc<Mutex<Vec<Update>>>,
    query_error: Mutex<Option<BoxError>>,
}

impl FakeTracker {
    pub fn new(tasks: Vec<Task>, updates: Arc<Mutex<Vec<Update>>>) -> Self {
        Self { tasks, updates, query_error: Mutex::new(None) }
    }

    /// A tracker whose query fails with `error`.
    pub fn failing_query(error: BoxError, updates: Arc<Mutex<Vec<Update>>>) -> Self {
        Self { tasks: Vec::new(), updates, query_error: Mutex::new(Some(error)) }
    }
}

impl TaskTracker for FakeTracker {
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>> {
        let result = match self.query_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(self.tasks.clone()),
        };
        Box::pin(async move { result })
    }

    fn update_task<'a>(
        &'a self,
        task_id: &'a str,
        acceptance: &'a str,
        status: TaskStatus,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            self.updates.lock().unwrap().push(Update {
                task_id: task_id.to_string(),
                acceptance: acceptance.to_string(),
                status,
            });
            Ok(())
        })
    }
}

/// Source control that logs `"<step> <detail>"` per call.
///
/// Optionally fails the first call whose step and detail match.
pub struct FakeVcs {
    calls: Arc<Mutex<Vec<String>>>,
    fail_on: Option<(&'static str, String)>,
    checks: String,
}

impl FakeVcs {
    pub fn new(calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self { calls, fail_on: None, checks: "build\tpass\t1m2s".to_string() }
    }

    /// Fails `step` calls whose detail contains `needle`.
    pub fn failing(calls: Arc<Mutex<Vec<String>>>, step: &'static str, needle: &str) -> Self {
        Self { fail_on: Some((step, needle.to_string())), ..Self::new(calls) }
    }

    fn log(&self, step: &'static str, detail: &str) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(format!("{step} {detail}"));
        match &self.fail_on {
            Some((fail_step, needle)) if *fail_step == step && detail.contains(needle.as_str()) => {
                Err(format!("{step} rejected by remote").into())
            }
            _ => Ok(()),
        }
    }
}

impl SourceControl for FakeVcs {
    fn branch_and_checkout(&self, branch: &str) -> Result<(), BoxError> {
        self.log("checkout", branch)
    }

    fn stage_and_commit(&self, path: &Path, message: &str) -> Result<(), BoxError> {
        self.log("commit", &format!("{} {message}", path.display()))
    }

    fn push(&self, branch: &str) -> Result<(), BoxError> {
        self.log("push", branch)
    }

    fn create_pull_request(&self, request: &PullRequest) -> Result<String, BoxError> {
        self.log("pr", &request.title)?;
        let number = self.calls.lock().unwrap().iter().filter(|c| c.starts_with("pr ")).count();
        Ok(format!("https://github.com/{}/pull/{number}", request.repo))
    }

    fn watch_checks(&self, pr_url: &str, timeout: Option<Duration>) -> Result<String, BoxError> {
        self.log("checks", &format!("{pr_url} {timeout:?}"))?;
        Ok(self.checks.clone())
    }
}
