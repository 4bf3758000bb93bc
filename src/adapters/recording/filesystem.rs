//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: String,
    contents: &'a str,
}

fn path_input(path: &Path) -> PathInput {
    PathInput { path: path.display().to_string() }
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.read_to_string(path);
        record_result(&self.recorder, "fs", "read_to_string", &path_input(path), &result);
        result
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: path.display().to_string(), contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let exists = self.inner.exists(path);
        record_interaction(&self.recorder, "fs", "exists", &path_input(path), &exists);
        exists
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.create_dir_all(path);
        record_result(&self.recorder, "fs", "create_dir_all", &path_input(path), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    #[test]
    fn records_each_call_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("fs.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
            let file = dir.path().join("mocks/a.mock.json");
            assert!(!fs.exists(&file));
            fs.write(&file, "{}\n").unwrap();
            assert_eq!(fs.read_to_string(&file).unwrap(), "{}\n");
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        let exists_at = content.find("method: exists").unwrap();
        let write_at = content.find("method: write").unwrap();
        let read_at = content.find("method: read_to_string").unwrap();
        assert!(exists_at < write_at && write_at < read_at);
    }
}
