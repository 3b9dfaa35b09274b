//! Identifier bounds
//!
//! Client-supplied identifiers are sanity-checked before any query runs.

use super::ValidationError;

/// Largest id accepted in paths and query strings.
pub const MAX_ID: i64 = 1_000_000;

/// Media ids in a tweet body must stay strictly below this bound.
pub const MEDIA_ID_LIMIT: i64 = 1_000_000;

/// Check that `value` lies in `1..=MAX_ID`.
pub fn check_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if (1..=MAX_ID).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: 1,
            max: MAX_ID,
        })
    }
}
