//! Error types shared across the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when required configuration is missing or invalid.
pub const CONFIG_EXIT_CODE: u8 = 2;

/// Top-level failure of a pipeline command.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more required environment variables are empty or unset.
    #[error("Missing required env vars: {}", missing.join(", "))]
    ConfigurationMissing {
        /// Names of the missing variables, in declaration order.
        missing: Vec<String>,
    },

    /// An optional setting was present but could not be interpreted.
    #[error("Invalid value for {key}: {reason}")]
    InvalidConfig {
        /// The environment variable name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The task tracker rejected or failed a request.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A version-control or hosting command failed.
    #[error("{step} failed: {message}")]
    SourceControl {
        /// The lifecycle step that issued the command (e.g. "push").
        step: &'static str,
        /// The adapter's failure message.
        message: String,
    },

    /// The mock artifact could not be written or failed validation.
    #[error(transparent)]
    Mock(#[from] MockError),

    /// The async runtime could not be started.
    #[error("Failed to start runtime: {0}")]
    Runtime(String),

    /// A recording session could not be created or flushed.
    #[error("Recording failed: {0}")]
    Recording(String),

    /// Tasks failed while the run continued past errors.
    #[error("{failed} of {total} task(s) failed")]
    TasksFailed {
        /// Number of failed tasks.
        failed: usize,
        /// Number of tasks attempted.
        total: usize,
    },

    /// The command line could not be parsed.
    #[error("{0}")]
    Usage(String),
}

impl PipelineError {
    /// Process exit code for this error.
    ///
    /// Configuration and usage problems get a distinguished code; everything
    /// else is a generic failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigurationMissing { .. } | Self::InvalidConfig { .. } | Self::Usage(_) => {
                CONFIG_EXIT_CODE
            }
            _ => 1,
        }
    }
}

/// Failures talking to the task tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("tracker request failed: {0}")]
    Http(String),

    /// The tracker answered with a non-success status.
    #[error("tracker API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the tracker, or the raw body.
        message: String,
    },

    /// A response row did not match the expected property schema.
    #[error("tracker schema mismatch: {0}")]
    Schema(String),

    /// The response body was not valid JSON for the expected shape.
    #[error("failed to decode tracker response: {0}")]
    Decode(String),
}

/// Failures creating or validating a mock artifact.
#[derive(Debug, Error)]
pub enum MockError {
    /// The file could not be read, written, or its directory created.
    #[error("mock I/O error at {}: {message}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The file is not valid JSON.
    #[error("mock at {} is not valid JSON: {message}", path.display())]
    Parse {
        /// Path of the mock file.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// The top-level JSON value is not an object.
    #[error("mock at {} must be a JSON object", path.display())]
    NotAnObject {
        /// Path of the mock file.
        path: PathBuf,
    },

    /// Required top-level fields are absent.
    #[error("mock missing required fields: {}", missing.join(", "))]
    MissingFields {
        /// Path of the mock file.
        path: PathBuf,
        /// Missing field names, sorted.
        missing: Vec<String>,
    },
}
