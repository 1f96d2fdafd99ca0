//! Deterministic exponential backoff.

use crate::tool_registry::domain::ResilienceSettings;
use std::time::Duration;

/// Retry budget and backoff curve for one logical call.
///
/// The delay before retry `n` (zero-based) is
/// `min(base_delay * multiplier^n, max_delay)`. No jitter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: u32,
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(
        max_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
        multiplier: u32,
    ) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
            multiplier,
        }
    }

    /// Creates a policy from configured settings and a retry budget.
    #[must_use]
    pub const fn from_settings(settings: &ResilienceSettings, max_retries: u32) -> Self {
        Self::new(
            max_retries,
            Duration::from_millis(settings.base_delay_ms),
            Duration::from_millis(settings.max_delay_ms),
            settings.backoff_multiplier,
        )
    }

    /// Returns the number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the total number of attempts allowed.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns the delay to wait after failed attempt `attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.multiplier
            .checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Returns a copy with every field present in `overrides` replaced.
    #[must_use]
    pub fn with_overrides(self, overrides: &RetryOverrides) -> Self {
        Self {
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            base_delay: overrides.base_delay.unwrap_or(self.base_delay),
            max_delay: overrides.max_delay.unwrap_or(self.max_delay),
            multiplier: overrides.multiplier.unwrap_or(self.multiplier),
        }
    }
}

/// Per-call replacements for the endpoint's retry settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryOverrides {
    /// Retry budget replacing the endpoint's.
    pub max_retries: Option<u32>,
    /// Base delay replacing the configured one.
    pub base_delay: Option<Duration>,
    /// Delay cap replacing the configured one.
    pub max_delay: Option<Duration>,
    /// Growth factor replacing the configured one.
    pub multiplier: Option<u32>,
}

impl RetryOverrides {
    /// Overrides the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Overrides the base delay.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = Some(base_delay);
        self
    }
}
