//! Adapter implementations for the port traits.
//!
//! - `live`: real disk, HTTP, and CLI access.
//! - `recording`: wraps another adapter and captures calls to a cassette.
//! - `replaying`: serves calls from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
