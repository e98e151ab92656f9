//! Error types for dayclock-core.
//!
//! Every operation in this crate is a pure function, so errors are returned
//! synchronously with no partial state. Callers translate them into
//! user-visible messages.

use thiserror::Error;

/// The main error type for dayclock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayclockError {
    /// Unrecognized IANA timezone identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Non-positive day count, or a range whose start is after its end.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A single record that cannot be assigned to a local day.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A wall-clock tuple that does not name a valid calendar time.
    #[error("Invalid wall clock: {0}")]
    InvalidWallClock(String),

    /// Error parsing timestamp or date input.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl DayclockError {
    /// Build a [`DayclockError::MalformedRecord`] whose index is filled in later
    /// by the grouper.
    pub fn malformed(reason: impl Into<String>) -> Self {
        DayclockError::MalformedRecord {
            index: 0,
            reason: reason.into(),
        }
    }

    /// Whether a grouping pass may skip this error and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DayclockError::MalformedRecord { .. })
    }
}

/// Result type alias for dayclock operations.
pub type Result<T> = std::result::Result<T, DayclockError>;
