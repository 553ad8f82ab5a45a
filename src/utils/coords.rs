//! Coordinate conversion helpers.
//!
//! All public APIs in this crate take 1-based genomic positions; internal
//! buffer and line offsets are 0-based. Conversion lives here rather than
//! as ad hoc arithmetic at call sites.

use crate::error::{ConsensusError, Result};

/// Convert a 1-based genomic position to a 0-based offset.
///
/// # Errors
///
/// Returns `ConsensusError::Range` for position 0, which has no 0-based
/// counterpart.
pub fn to_zero_based(pos: u64) -> Result<u64> {
    if pos == 0 {
        return Err(ConsensusError::Range(
            "position must be >= 1 (positions are 1-based)".to_string(),
        ));
    }
    Ok(pos - 1)
}

/// Convert a 0-based offset back to a 1-based genomic position.
#[must_use]
pub fn to_one_based(offset: u64) -> u64 {
    offset + 1
}
