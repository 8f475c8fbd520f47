//! Error types for match configuration.
//!
//! The engine itself cannot fail once constructed; these errors cover the
//! boundary checks callers run before building a [`crate::MatchEngine`].

use thiserror::Error;

/// Errors raised while validating a match configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Player name is empty or contains characters other than letters and spaces.
    #[error("invalid player name '{0}': use letters and spaces only")]
    InvalidName(String),

    /// Match length is not best of 3 or best of 5.
    #[error("invalid number of sets {0}: expected 3 or 5")]
    InvalidSets(u32),

    /// Starting bias is outside the percent range.
    #[error("invalid starting bias {0}: expected 0..=100")]
    InvalidBias(i64),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
