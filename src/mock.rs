//! Mock artifacts: per-task contract fixtures stored under `<root>/mocks/`.
//!
//! A mock is created once with default content and afterwards only
//! re-validated, so hand edits survive later runs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::MockError;
use crate::ports::{FileSystem, Task};

/// Directory (relative to the repository root) holding mock files.
pub const MOCKS_DIR: &str = "mocks";

/// Top-level fields every mock must carry.
pub const REQUIRED_FIELDS: [&str; 7] =
    ["task_id", "title", "description", "inputs", "outputs", "cases", "notes"];

/// A named test case inside a mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockCase {
    /// Case name.
    pub name: String,
    /// Inputs fed to the system under test.
    pub inputs: Value,
    /// Expected outputs.
    pub expected: Value,
}

/// The default document written for a new task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockArtifact {
    /// Tracker identifier of the task.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// What the mock covers.
    pub description: String,
    /// Request shape.
    pub inputs: Value,
    /// Response shape.
    pub outputs: Value,
    /// Ordered test cases.
    pub cases: Vec<MockCase>,
    /// Edge cases and exclusions.
    pub notes: String,
}

impl MockArtifact {
    /// Default mock for a task.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            description: "mock purpose and scope".to_string(),
            inputs: json!({ "params": {}, "body": {} }),
            outputs: json!({ "status": 200, "body": {} }),
            cases: vec![MockCase {
                name: "happy-path".to_string(),
                inputs: json!({}),
                expected: json!({}),
            }],
            notes: "edge cases / exclusions".to_string(),
        }
    }
}

/// Path of the mock for `task_id`: `<root>/mocks/<id without dashes>.mock.json`.
#[must_use]
pub fn mock_path(root: &Path, task_id: &str) -> PathBuf {
    root.join(MOCKS_DIR).join(format!("{}.mock.json", task_id.replace('-', "")))
}

/// Ensures the task's mock exists, writing the default document if absent.
///
/// Returns the mock's path. An existing file is left untouched.
///
/// # Errors
///
/// Returns [`MockError::Io`] if the directory or file cannot be written.
pub fn ensure_mock(fs: &dyn FileSystem, task: &Task, root: &Path) -> Result<PathBuf, MockError> {
    let dir = root.join(MOCKS_DIR);
    fs.create_dir_all(&dir)
        .map_err(|e| MockError::Io { path: dir.clone(), message: e.to_string() })?;

    let path = mock_path(root, &task.id);
    if fs.exists(&path) {
        tracing::debug!(path = %path.display(), "mock already present");
        return Ok(path);
    }

    let mut contents = serde_json::to_string_pretty(&MockArtifact::for_task(task))
        .map_err(|e| MockError::Io { path: path.clone(), message: e.to_string() })?;
    contents.push('\n');
    fs.write(&path, &contents).map_err(|e| MockError::Io { path: path.clone(), message: e.to_string() })?;
    tracing::debug!(path = %path.display(), "wrote default mock");
    Ok(path)
}

/// Checks that the mock at `path` is a JSON object with every required field.
///
/// Extra fields are allowed.
///
/// # Errors
///
/// Returns [`MockError::MissingFields`] listing absent fields in sorted order,
/// or an I/O, parse, or shape error.
pub fn validate_mock(fs: &dyn FileSystem, path: &Path) -> Result<(), MockError> {
    let raw = fs
        .read_to_string(path)
        .map_err(|e| MockError::Io { path: path.to_path_buf(), message: e.to_string() })?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| MockError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
    let Some(object) = value.as_object() else {
        return Err(MockError::NotAnObject { path: path.to_path_buf() });
    };

    let missing: BTreeSet<&str> =
        REQUIRED_FIELDS.into_iter().filter(|field| !object.contains_key(*field)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MockError::MissingFields {
            path: path.to_path_buf(),
            missing: missing.into_iter().map(str::to_string).collect(),
        })
    }
}
