//! Retry-with-backoff and per-endpoint circuit breaking.
//!
//! [`services::RetryExecutor`] wraps one logical remote call in a bounded
//! retry loop and reports every attempt outcome to the
//! [`services::CircuitBreakerRegistry`], which sheds load from endpoints that
//! keep failing.

pub mod domain;
pub mod services;
