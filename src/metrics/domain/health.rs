//! Health verdict derived from success rate and latency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Success rate at or above which the gateway can be healthy.
pub const HEALTHY_SUCCESS_RATE: f64 = 95.0;
/// Success rate below which the gateway is unhealthy.
pub const UNHEALTHY_SUCCESS_RATE: f64 = 80.0;
/// Average response time at or below which the gateway can be healthy.
pub const HEALTHY_RESPONSE_TIME_MS: f64 = 5_000.0;
/// Average response time above which the gateway is unhealthy.
pub const UNHEALTHY_RESPONSE_TIME_MS: f64 = 10_000.0;

/// Three-level gateway health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Success rate and latency are both within the healthy bounds.
    Healthy,
    /// Neither healthy nor unhealthy.
    Degraded,
    /// Success rate or latency is past the unhealthy bound.
    Unhealthy,
}

impl HealthStatus {
    /// Derives the verdict from a success-rate percentage and an average
    /// response time in milliseconds.
    #[must_use]
    pub fn evaluate(success_rate: f64, average_response_time_ms: f64) -> Self {
        if success_rate < UNHEALTHY_SUCCESS_RATE
            || average_response_time_ms > UNHEALTHY_RESPONSE_TIME_MS
        {
            Self::Unhealthy
        } else if success_rate >= HEALTHY_SUCCESS_RATE
            && average_response_time_ms <= HEALTHY_RESPONSE_TIME_MS
        {
            Self::Healthy
        } else {
            Self::Degraded
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Health snapshot reported to operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Derived verdict.
    pub status: HealthStatus,
    /// Successful requests as a percentage of all requests.
    pub success_rate: f64,
    /// Mean of the recent response-time window in milliseconds.
    pub average_response_time_ms: f64,
    /// Time since start or the last reset in milliseconds.
    pub uptime_ms: u64,
}
