//! # Input Limits
//!
//! Hardcoded bounds for everything a caller can hand to the Registry.
//!
//! All limits are compiled into the binary and immutable at runtime.
//! Drafts that exceed them are rejected with `TempoError::InvalidInput`
//! before any state is touched.

use crate::TempoError;

/// Maximum length, in bytes, of a process, iteration or stage name.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum number of iterations a single Process may hold.
pub const MAX_ITERATIONS_PER_PROCESS: usize = 1_000;

/// Maximum number of stages a single Process may hold across all owners.
///
/// Bounds the stage arena so a Process snapshot stays cheap to build.
pub const MAX_STAGES_PER_PROCESS: usize = 10_000;

/// Validate a human-readable label.
///
/// Names must be non-blank and at most [`MAX_NAME_LENGTH`] bytes.
/// `what` names the field in the error message ("process", "stage", ...).
pub fn validate_name(name: &str, what: &str) -> Result<(), TempoError> {
    if name.trim().is_empty() {
        return Err(TempoError::InvalidInput(format!("{} name is empty", what)));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(TempoError::InvalidInput(format!(
            "{} name length {} exceeds maximum {} bytes",
            what,
            name.len(),
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}
