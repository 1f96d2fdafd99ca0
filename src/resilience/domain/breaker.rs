//! Per-endpoint circuit breaker state machine.
//!
//! The breaker is closed while `is_open` is false. Once the consecutive
//! failure count reaches the threshold it opens and rejects calls until the
//! cooldown has elapsed since the most recent failure. The first evaluation
//! after the cooldown closes it again with a zero count and lets the call
//! through; there is no single-probe half-open phase.

use crate::tool_registry::domain::ResilienceSettings;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Threshold and cooldown shared by every breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    failure_threshold: u32,
    cooldown: TimeDelta,
}

impl BreakerConfig {
    /// Creates a breaker configuration.
    #[must_use]
    pub const fn new(failure_threshold: u32, cooldown: TimeDelta) -> Self {
        Self {
            failure_threshold,
            cooldown,
        }
    }

    /// Creates a breaker configuration from configured settings.
    #[must_use]
    pub fn from_settings(settings: &ResilienceSettings) -> Self {
        let cooldown_ms = i64::try_from(settings.cooldown_ms).unwrap_or(i64::MAX);
        Self::new(
            settings.failure_threshold,
            TimeDelta::try_milliseconds(cooldown_ms).unwrap_or(TimeDelta::MAX),
        )
    }

    /// Returns the consecutive failures that open the breaker.
    #[must_use]
    pub const fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Returns the cooldown after the last failure.
    #[must_use]
    pub const fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self::from_settings(&ResilienceSettings::default())
    }
}

/// Breaker state for one endpoint key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakerState {
    consecutive_failures: u32,
    is_open: bool,
    last_failure_at: Option<DateTime<Utc>>,
}

impl BreakerState {
    /// Returns the consecutive failure count.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns whether the breaker is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Returns the time of the most recent failure.
    #[must_use]
    pub const fn last_failure_at(&self) -> Option<DateTime<Utc>> {
        self.last_failure_at
    }

    /// Decides whether a call may proceed at `now`.
    ///
    /// An open breaker whose cooldown has elapsed is closed and reset before
    /// the call is admitted.
    pub fn admit(&mut self, now: DateTime<Utc>, config: &BreakerConfig) -> bool {
        if !self.is_open {
            return true;
        }
        let cooled_down = self
            .last_failure_at
            .is_none_or(|last_failure| now.signed_duration_since(last_failure) > config.cooldown);
        if cooled_down {
            *self = Self::default();
        }
        cooled_down
    }

    /// Records a successful call, closing the breaker.
    pub const fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.is_open = false;
    }

    /// Records a failed call at `now`.
    ///
    /// Returns `true` when this failure opened the breaker.
    pub fn record_failure(&mut self, now: DateTime<Utc>, config: &BreakerConfig) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure_at = Some(now);
        let was_open = self.is_open;
        if self.consecutive_failures >= config.failure_threshold {
            self.is_open = true;
        }
        self.is_open && !was_open
    }

    /// Returns the externally visible summary.
    #[must_use]
    pub const fn stats(&self) -> BreakerStats {
        BreakerStats {
            is_open: self.is_open,
            failure_count: self.consecutive_failures,
            last_failure_at: self.last_failure_at,
        }
    }
}

/// Operator-facing breaker summary for one endpoint key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerStats {
    /// Whether calls are currently rejected.
    pub is_open: bool,
    /// Consecutive failures recorded.
    pub failure_count: u32,
    /// Time of the most recent failure.
    pub last_failure_at: Option<DateTime<Utc>>,
}
