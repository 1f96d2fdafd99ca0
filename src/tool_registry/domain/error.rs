//! Error types for tool registry domain validation.

use super::ToolId;
use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The tool identifier is empty after trimming.
    #[error("tool identifier must not be empty")]
    EmptyToolId,

    /// The tool display name is empty after trimming.
    #[error("tool {0} must have a non-empty name")]
    EmptyToolName(ToolId),

    /// The endpoint address is empty after trimming.
    #[error("tool {0} must have a non-empty address")]
    EmptyAddress(ToolId),

    /// Port zero cannot be dialled.
    #[error("tool {0} must have a non-zero port")]
    ZeroPort(ToolId),

    /// A zero timeout would fail every call before it is sent.
    #[error("tool {0} must have a non-zero timeout")]
    ZeroTimeout(ToolId),

    /// Two tool entries share one identifier.
    #[error("duplicate tool identifier: {0}")]
    DuplicateToolId(ToolId),

    /// The per-endpoint pool capacity must allow at least one idle client.
    #[error("connection pool size must be at least 1")]
    ZeroPoolSize,

    /// The breaker would open before any failure was observed.
    #[error("circuit breaker failure threshold must be at least 1")]
    ZeroFailureThreshold,
}
