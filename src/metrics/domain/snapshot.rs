//! Point-in-time copies of the gateway counters.

use crate::tool_registry::domain::ToolId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters and derived latency at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Dispatches recorded at attempt time.
    pub total_requests: u64,
    /// Dispatches that ended in a successful envelope.
    pub successful_requests: u64,
    /// Dispatches that ended in a failure envelope.
    pub failed_requests: u64,
    /// Mean of the recent response-time window in milliseconds.
    pub average_response_time_ms: f64,
    /// Requests per tool identifier.
    pub tool_usage: BTreeMap<ToolId, u64>,
}

/// Usage of one tool relative to all requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolUsageStat {
    /// Requests addressed to the tool.
    pub count: u64,
    /// Share of all requests as a percentage.
    pub percentage: f64,
}
