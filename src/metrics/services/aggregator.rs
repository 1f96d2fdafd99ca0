//! Process-wide request counters and a bounded response-time window.

use crate::{
    gateway::domain::GatewayResponse,
    metrics::domain::{HealthReport, HealthStatus, MetricsSnapshot, ToolUsageStat},
    tool_registry::domain::ToolId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

/// Number of recent response times averaged for latency figures.
pub const DEFAULT_RESPONSE_WINDOW: usize = 1_000;

#[derive(Debug)]
struct MetricsState {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    tool_usage: BTreeMap<ToolId, u64>,
    response_times: VecDeque<u64>,
    response_time_sum: u64,
    started_at: DateTime<Utc>,
}

impl MetricsState {
    fn new(started_at: DateTime<Utc>, window: usize) -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            tool_usage: BTreeMap::new(),
            response_times: VecDeque::with_capacity(window),
            response_time_sum: 0,
            started_at,
        }
    }

    fn push_response_time(&mut self, duration_ms: u64, window: usize) {
        if self.response_times.len() == window
            && let Some(evicted) = self.response_times.pop_front()
        {
            self.response_time_sum = self.response_time_sum.saturating_sub(evicted);
        }
        self.response_times.push_back(duration_ms);
        self.response_time_sum = self.response_time_sum.saturating_add(duration_ms);
    }

    fn average_response_time_ms(&self) -> f64 {
        ratio(self.response_time_sum, self.response_times.len() as u64)
    }

    fn success_rate(&self) -> f64 {
        percentage(self.successful_requests, self.total_requests)
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "metrics are reported as approximate floating-point ratios"
)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Aggregates request outcomes for the process lifetime.
///
/// Counters live behind one mutex so a response is never counted without its
/// latency sample or vice versa.
pub struct MetricsAggregator<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    window: usize,
    state: Mutex<MetricsState>,
}

impl<C> MetricsAggregator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an aggregator whose uptime starts now.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_window(clock, DEFAULT_RESPONSE_WINDOW)
    }

    /// Creates an aggregator averaging over the last `window` responses.
    ///
    /// A zero window is treated as one.
    #[must_use]
    pub fn with_window(clock: Arc<C>, window: usize) -> Self {
        let capacity = window.max(1);
        let state = MetricsState::new(clock.utc(), capacity);
        Self {
            clock,
            window: capacity,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, MetricsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts a dispatch attempt against `tool_id`.
    pub fn record_request(&self, tool_id: &ToolId) {
        let mut state = self.state();
        state.total_requests += 1;
        *state.tool_usage.entry(tool_id.clone()).or_insert(0) += 1;
    }

    /// Counts the outcome of a dispatch and samples its latency.
    pub fn record_response(&self, response: &GatewayResponse) {
        let mut state = self.state();
        if response.success {
            state.successful_requests += 1;
        } else {
            state.failed_requests += 1;
        }
        state.push_response_time(response.duration_ms, self.window);
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state();
        MetricsSnapshot {
            total_requests: state.total_requests,
            successful_requests: state.successful_requests,
            failed_requests: state.failed_requests,
            average_response_time_ms: state.average_response_time_ms(),
            tool_usage: state.tool_usage.clone(),
        }
    }

    /// Returns successful requests as a percentage of all requests, or zero
    /// before the first request.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        self.state().success_rate()
    }

    /// Returns the mean of the response-time window in milliseconds.
    #[must_use]
    pub fn average_response_time_ms(&self) -> f64 {
        self.state().average_response_time_ms()
    }

    /// Returns the time since construction or the last reset.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        let started_at = self.state().started_at;
        (self.clock.utc() - started_at).to_std().unwrap_or_default()
    }

    /// Returns requests per second since construction or the last reset.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "request rate is reported as an approximate floating-point value"
    )]
    pub fn request_rate(&self) -> f64 {
        let uptime = self.uptime();
        if uptime.is_zero() {
            return 0.0;
        }
        self.state().total_requests as f64 / uptime.as_secs_f64()
    }

    /// Returns each tool's request count and share of all requests.
    #[must_use]
    pub fn tool_usage_stats(&self) -> BTreeMap<ToolId, ToolUsageStat> {
        let state = self.state();
        state
            .tool_usage
            .iter()
            .map(|(tool_id, &count)| {
                let stat = ToolUsageStat {
                    count,
                    percentage: percentage(count, state.total_requests),
                };
                (tool_id.clone(), stat)
            })
            .collect()
    }

    /// Derives the current health report.
    #[must_use]
    pub fn health_report(&self) -> HealthReport {
        let (success_rate, average_response_time_ms) = {
            let state = self.state();
            (state.success_rate(), state.average_response_time_ms())
        };
        HealthReport {
            status: HealthStatus::evaluate(success_rate, average_response_time_ms),
            success_rate,
            average_response_time_ms,
            uptime_ms: u64::try_from(self.uptime().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Clears every counter and restarts uptime.
    pub fn reset(&self) {
        *self.state() = MetricsState::new(self.clock.utc(), self.window);
        info!("metrics reset");
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "usage shares are reported as floating-point percentages"
)]
fn percentage(part: u64, whole: u64) -> f64 {
    ratio(part, whole) * 100.0
}
