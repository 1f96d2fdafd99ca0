//! Domain model for retry backoff and circuit breaking.

mod backoff;
mod breaker;
mod error;

pub use backoff::{RetryOverrides, RetryPolicy};
pub use breaker::{BreakerConfig, BreakerState, BreakerStats};
pub use error::{AttemptError, ResilienceError};
