//! Uniform result envelope returned for every dispatch.

use super::DispatchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one dispatch.
///
/// Exactly one envelope is produced per call, whether it succeeded, failed,
/// timed out or was rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Whether the tool replied successfully.
    pub success: bool,
    /// Tool reply on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Human-readable failure on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Identifier the caller addressed, as given.
    pub tool_id: String,
    /// Time the envelope was built.
    pub timestamp: DateTime<Utc>,
    /// Elapsed time from dispatch start in milliseconds.
    pub duration_ms: u64,
}

impl GatewayResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn succeeded(
        tool_id: impl Into<String>,
        data: impl Into<String>,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            tool_id: tool_id.into(),
            timestamp,
            duration_ms,
        }
    }

    /// Builds a failure envelope carrying the error's message.
    #[must_use]
    pub fn failed(
        tool_id: impl Into<String>,
        error: &DispatchError,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            tool_id: tool_id.into(),
            timestamp,
            duration_ms,
        }
    }
}
