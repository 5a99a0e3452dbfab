//! Error types raised while building the detection core.

use thiserror::Error;

/// Rejected detector configuration. Only ever raised at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("command pattern cannot be empty")]
    EmptyPattern,
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
    #[error("command of {len} inputs does not fit a history of {capacity} slots (max {})", capacity.saturating_sub(1))]
    PatternTooLong { len: usize, capacity: usize },
}
