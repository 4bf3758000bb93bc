//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path panic when called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the filesystem port cassette file.
    pub fs: Option<PathBuf>,
    /// Path to the tracker port cassette file.
    pub tracker: Option<PathBuf>,
    /// Path to the source-control port cassette file.
    pub vcs: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the tracker port.
    pub tracker: Option<CassetteReplayer>,
    /// Replayer for the source-control port.
    pub vcs: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where every port path is `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at the `<port>.cassette.yaml` files in `dir`, as
    /// written by a recording session.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        Self {
            fs: Some(dir.join("fs.cassette.yaml")),
            tracker: Some(dir.join("tracker.cassette.yaml")),
            vcs: Some(dir.join("vcs.cassette.yaml")),
        }
    }

    /// Load a cassette file and create a replayer over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load every configured cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            fs: self.fs.as_deref().map(Self::load).transpose()?,
            tracker: self.tracker.as_deref().map(Self::load).transpose()?,
            vcs: self.vcs.as_deref().map(Self::load).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn session_dir_names_one_file_per_port() {
        let config = CassetteConfig::from_session_dir(Path::new("/runs/1"));
        assert_eq!(config.fs.unwrap(), PathBuf::from("/runs/1/fs.cassette.yaml"));
        assert_eq!(config.tracker.unwrap(), PathBuf::from("/runs/1/tracker.cassette.yaml"));
        assert_eq!(config.vcs.unwrap(), PathBuf::from("/runs/1/vcs.cassette.yaml"));
    }

    #[test]
    fn loads_only_configured_ports() {
        let dir = tempfile::tempdir().unwrap();
        let tracker_path = dir.path().join("tracker.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&tracker_path, "tracker", "abc");
        recorder.record("tracker", "query_pending", json!({}), json!({"ok": []}));
        recorder.finish().unwrap();

        let config = CassetteConfig { tracker: Some(tracker_path), ..CassetteConfig::default() };
        let mut replayers = config.load_all().unwrap();

        let tracker = replayers.tracker.as_mut().unwrap();
        assert_eq!(tracker.next_interaction("tracker", "query_pending").output, json!({"ok": []}));
        assert!(replayers.fs.is_none());
        assert!(replayers.vcs.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = CassetteConfig {
            vcs: Some(PathBuf::from("/nonexistent/vcs.cassette.yaml")),
            ..CassetteConfig::default()
        };
        let err = config.load_all().err().unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }
}
