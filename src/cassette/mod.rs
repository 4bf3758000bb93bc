//! Cassettes: recorded port interactions used to capture and replay runs.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
