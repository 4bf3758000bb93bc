//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Per-port recorders for one recorded command, writing into one directory.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for tracker interactions.
    pub tracker: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for source-control interactions.
    pub vcs: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Start a session writing `<port>.cassette.yaml` files into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already holds cassettes or cannot be
    /// created.
    pub fn new(output_dir: &Path) -> Result<Self, String> {
        if output_dir.join("tracker.cassette.yaml").exists() {
            return Err(format!("Cassettes already recorded in {}", output_dir.display()));
        }
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let commit = commit_hash();
        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), &commit)))
        };

        Ok(Self {
            fs: make_recorder("fs"),
            tracker: make_recorder("tracker"),
            vcs: make_recorder("vcs"),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write every port's cassette and return the output directory.
    ///
    /// All recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file cannot
    /// be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.fs, "fs")?;
        finish_one(self.tracker, "tracker")?;
        finish_one(self.vcs, "vcs")?;
        Ok(self.output_dir)
    }
}

/// HEAD of the current repository, or `"unknown"` outside one.
fn commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        tracing::warn!("could not read git commit for cassette; using 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_one_cassette_per_port() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("recording");
        let session = RecordingSession::new(&out).unwrap();
        session.tracker.lock().unwrap().record("tracker", "query_pending", json!({}), json!({"ok": []}));

        let written = session.finish().unwrap();
        assert_eq!(written, out);
        for port in ["fs", "tracker", "vcs"] {
            assert!(out.join(format!("{port}.cassette.yaml")).exists(), "{port} cassette missing");
        }
    }

    #[test]
    fn refuses_to_overwrite_previous_recording() {
        let dir = tempfile::tempdir().unwrap();
        RecordingSession::new(dir.path()).unwrap().finish().unwrap();
        assert!(RecordingSession::new(dir.path()).is_err());
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path()).unwrap();
        let held = Arc::clone(&session.vcs);
        let err = session.finish().unwrap_err();
        assert!(err.contains("vcs still has references"));
        drop(held);
    }
}
