//! Replaying adapters that serve recorded interactions.

pub mod filesystem;
pub mod tracker;
pub mod vcs;

pub use filesystem::ReplayingFileSystem;
pub use tracker::ReplayingTaskTracker;
pub use vcs::ReplayingSourceControl;

use std::sync::Mutex;

use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;

/// Pull the next recorded output for `port::method`.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn next_output(replayer: &Mutex<CassetteReplayer>, port: &str, method: &str) -> Value {
    let mut guard = replayer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.next_interaction(port, method).output.clone()
}

/// Turn a recorded `{"ok": ..}` / `{"err": ".."}` output back into a `Result`.
///
/// Mirror of `recording::record_result`. A bare value is treated as `ok`.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
