use std::time::Duration;

use thiserror::Error;

/// Returned by [`BackoffConfig::validate`](crate::backoff::BackoffConfig::validate).
/// The calculator itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("backoff factor must be a positive finite number, got {0}")]
    InvalidFactor(f64),
    #[error("base start delay {base_start:?} exceeds base max delay {base_max:?}")]
    BaseStartExceedsMax {
        base_start: Duration,
        base_max: Duration,
    },
    #[error("jitter min {jitter_min:?} exceeds jitter max {jitter_max:?}")]
    InvertedJitter {
        jitter_min: Duration,
        jitter_max: Duration,
    },
}
