//! Error types for protocol configuration.

use thiserror::Error;

/// Errors raised while loading or validating configuration tables.
///
/// All of these are fatal at load time. Values are never corrected silently.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, unknown field, or a negative / fractional number.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A ratio is above the ratio multiplier.
    #[error("{field} is {value}, above the ratio multiplier {max}")]
    RatioOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// Governor and protocol shares together exceed the whole.
    #[error("governor and protocol funds shares sum to {sum}, above {max}")]
    SharesExceedWhole { sum: u64, max: u64 },

    #[error("project milestones must not be empty")]
    NoMilestones,

    #[error("project milestones must be strictly increasing: {prev} then {next} at index {index}")]
    MilestonesNotIncreasing { index: usize, prev: u64, next: u64 },

    #[error("{0} must be non-zero")]
    Zero(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
