//! Failure kinds produced while executing a remote call.

use crate::{
    connection::ports::ToolClientError,
    tool_registry::domain::{EndpointKey, ToolId},
};
use std::time::Duration;
use thiserror::Error;

/// Failure of a single attempt. Both kinds are retried and both count
/// against the endpoint's breaker.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// The remote did not answer within the endpoint deadline.
    #[error("Request timeout")]
    Timeout(Duration),

    /// The call failed at the transport or remote level.
    #[error("RPC error: {0}")]
    Transport(#[from] ToolClientError),
}

/// Failure of a whole logical call.
#[derive(Debug, Clone, Error)]
pub enum ResilienceError {
    /// The endpoint is shedding load; no attempt was made.
    #[error("Circuit breaker is open for tool {tool_id}")]
    CircuitOpen {
        /// Tool the call was addressed to.
        tool_id: ToolId,
        /// Endpoint key whose breaker is open.
        endpoint: EndpointKey,
    },

    /// Every allowed attempt failed; the last failure is surfaced.
    #[error("{last_error}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last_error: AttemptError,
    },
}
