//! Recording adapters that capture interactions to cassettes.

pub mod filesystem;
pub mod tracker;
pub mod vcs;

pub use filesystem::RecordingFileSystem;
pub use tracker::RecordingTaskTracker;
pub use vcs::RecordingSourceControl;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::cassette::recorder::CassetteRecorder;

fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")))
}

fn push(recorder: &Arc<Mutex<CassetteRecorder>>, port: &str, method: &str, input: Value, output: Value) {
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => tracing::warn!(port, method, "dropping interaction, recorder lock poisoned: {e}"),
    }
}

/// Record an interaction with a plain (non-Result) return value.
///
/// Mirror of `replaying::next_output`.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    push(recorder, port, method, to_value(input), to_value(output));
}

/// Record a `Result<T, E>` interaction.
///
/// Mirror of `replaying::extract_result`. `Ok(v)` is stored as `{"ok": v}`
/// and `Err(e)` as `{"err": e.to_string()}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": to_value(v) }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };
    push(recorder, port, method, to_value(input), output);
}
