//! Exponential backoff calculator for retry loops.
//!
//! Tracks how many attempts have failed and derives the delay to wait
//! before the next one: `base_start * factor^attempts`, capped at
//! `base_max`, plus an optional uniformly sampled jitter term.
//!
//! The calculator never sleeps and is not synchronized. One instance
//! belongs to one retry sequence; wrap it in a `Mutex` if several tasks
//! must share it.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::ConfigError;

/// Growth factor used when the configured factor is left at zero.
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Backoff parameters. Immutable once handed to [`Backoff::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    /// Delay before jitter at attempt 0. The shortest possible backoff
    /// is `base_start + jitter_min`.
    pub base_start: Duration,
    /// Ceiling on the pre-jitter delay. The longest possible backoff
    /// is `base_max + jitter_max`.
    pub base_max: Duration,
    /// Exponential growth per attempt. `0.0` means "use [`DEFAULT_FACTOR`]".
    pub factor: f64,
    /// Lower bound of the random duration added on top of the base delay,
    /// so clients backing off at the same time do not retry in lockstep.
    pub jitter_min: Duration,
    /// Upper bound of the jitter. Zero disables jitter entirely.
    pub jitter_max: Duration,
}

impl BackoffConfig {
    /// Config without jitter and with the default growth factor.
    pub const fn new(base_start: Duration, base_max: Duration) -> Self {
        Self {
            base_start,
            base_max,
            factor: 0.0,
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    #[must_use]
    pub const fn with_jitter(mut self, jitter_min: Duration, jitter_max: Duration) -> Self {
        self.jitter_min = jitter_min;
        self.jitter_max = jitter_max;
        self
    }

    /// Whether a jitter term is added to each delay.
    pub fn jitter_enabled(&self) -> bool {
        !self.jitter_max.is_zero()
    }

    /// Opt-in sanity check. [`Backoff::new`] accepts any config, so callers
    /// that want to reject odd values up front call this themselves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = effective_factor(self.factor);
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::InvalidFactor(factor));
        }
        if self.base_start > self.base_max {
            return Err(ConfigError::BaseStartExceedsMax {
                base_start: self.base_start,
                base_max: self.base_max,
            });
        }
        if self.jitter_enabled() && self.jitter_min > self.jitter_max {
            return Err(ConfigError::InvertedJitter {
                jitter_min: self.jitter_min,
                jitter_max: self.jitter_max,
            });
        }
        Ok(())
    }
}

fn effective_factor(factor: f64) -> f64 {
    if factor == 0.0 {
        DEFAULT_FACTOR
    } else {
        factor
    }
}

#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    /// Failed attempts recorded since construction or the last `reset()`.
    attempts: u32,
}

impl Backoff {
    pub fn new(mut config: BackoffConfig) -> Self {
        config.factor = effective_factor(config.factor);
        Self { config, attempts: 0 }
    }

    /// Effective configuration, with the default factor applied.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    pub fn get_retries(&self) -> u32 {
        self.attempts
    }

    /// Starts a new retry sequence. Called once the operation succeeded
    /// and the calculator is kept around for later failures.
    pub fn reset(&mut self) {
        debug!(attempts = self.attempts, "Backoff reset");
        self.attempts = 0;
    }

    /// Records one more failed attempt and returns the new count.
    pub fn incr(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Returns true if the attempt count has reached `max`.
    pub fn exceeded_max_attempts(&self, max: u32) -> bool {
        self.attempts >= max
    }

    /// Pre-jitter delay for the current attempt, capped at `base_max`.
    pub fn base_delay(&self) -> Duration {
        nanos_to_duration(self.base_nanos())
    }

    /// Delay to wait right now. Does not touch the attempt counter, so
    /// without jitter repeated calls return the same value.
    pub fn get(&self) -> Duration {
        self.get_with_rng(&mut rand::thread_rng())
    }

    /// Same as [`get`](Self::get), drawing jitter from `rng`.
    pub fn get_with_rng<R: Rng>(&self, rng: &mut R) -> Duration {
        let mut backoff = self.base_nanos();

        if self.config.jitter_enabled() {
            let min = self.config.jitter_min.as_nanos() as f64;
            let max = self.config.jitter_max.as_nanos() as f64;
            let unit: f64 = rng.gen();
            backoff += (max - min) * unit + min;
        }

        nanos_to_duration(backoff)
    }

    /// Returns the current delay, then records the attempt.
    /// This is the call a retry loop makes once per failure.
    pub fn get_incr(&mut self) -> Duration {
        self.get_incr_with_rng(&mut rand::thread_rng())
    }

    pub fn get_incr_with_rng<R: Rng>(&mut self, rng: &mut R) -> Duration {
        let delay = self.get_with_rng(rng);
        trace!(attempt = self.attempts, delay_ms = delay.as_millis() as u64, "Backoff delay computed");
        self.incr();
        delay
    }

    fn base_nanos(&self) -> f64 {
        let start = self.config.base_start.as_nanos() as f64;
        let max = self.config.base_max.as_nanos() as f64;
        let raw = start * self.config.factor.powf(f64::from(self.attempts));
        // NaN compares false and passes through; it ends up as zero below
        if raw > max {
            max
        } else {
            raw
        }
    }
}

/// `as` saturates: negative and NaN become zero, overflow becomes `u64::MAX`.
fn nanos_to_duration(nanos: f64) -> Duration {
    Duration::from_nanos(nanos as u64)
}
