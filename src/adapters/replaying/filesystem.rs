//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        extract_result(&next_output(&self.replayer, "fs", "read_to_string"), "fs::read_to_string")
    }

    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        extract_result(&next_output(&self.replayer, "fs", "write"), "fs::write")
    }

    fn exists(&self, _path: &Path) -> bool {
        next_output(&self.replayer, "fs", "exists").as_bool().unwrap_or(false)
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        extract_result(&next_output(&self.replayer, "fs", "create_dir_all"), "fs::create_dir_all")
    }
}
