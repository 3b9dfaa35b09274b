//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric value outside the accepted range (inclusive)
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// String doesn't match required format (e.g., file extension)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// An operation names the same entity on both sides (e.g., self-follow)
    SelfReference { reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::SelfReference { reason } => f.write_str(reason),
        }
    }
}

impl std::error::Error for ValidationError {}
