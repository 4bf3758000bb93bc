//! `validate-mock`: check one mock file.

use std::path::Path;

use crate::error::PipelineError;
use crate::mock;
use crate::ports::FileSystem;

/// Validates the mock at `path` and prints the result.
///
/// # Errors
///
/// Returns [`PipelineError::Mock`] naming the missing fields or the read or
/// parse failure.
pub fn run(fs: &dyn FileSystem, path: &Path) -> Result<(), PipelineError> {
    mock::validate_mock(fs, path)?;
    println!("Mock OK: {}", path.display());
    Ok(())
}
