//! Stateful exponential backoff for retry loops.
//!
//! [`Backoff`] tracks failed attempts and returns how long to wait before
//! the next one. It does not sleep; the caller applies the delay with
//! whatever timer it already uses.
//!
//! ```
//! use std::time::Duration;
//! use expo_backoff::{Backoff, BackoffConfig};
//!
//! let mut backoff = Backoff::new(BackoffConfig::new(
//!     Duration::from_secs(1),
//!     Duration::from_secs(32),
//! ));
//! assert_eq!(backoff.get_incr(), Duration::from_secs(1));
//! assert_eq!(backoff.get_incr(), Duration::from_secs(2));
//! assert_eq!(backoff.get_retries(), 2);
//! ```

pub mod backoff;
pub mod config;
pub mod error;

pub use backoff::{Backoff, BackoffConfig, DEFAULT_FACTOR};
pub use error::ConfigError;
