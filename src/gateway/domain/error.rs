//! Failure kinds of one dispatch.

use crate::resilience::domain::ResilienceError;
use thiserror::Error;

/// Why a dispatch did not produce a reply.
///
/// Every variant is rendered into a failure envelope; none escapes the
/// dispatcher.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No tool is registered under the identifier.
    #[error("Unknown tool")]
    UnknownTool(String),

    /// The tool exists but dispatch to it is switched off.
    #[error("Tool is disabled")]
    ToolDisabled(String),

    /// The breaker rejected the call or every attempt failed.
    #[error(transparent)]
    Resilience(#[from] ResilienceError),
}

impl DispatchError {
    /// Returns whether the failure happened before any remote call could be
    /// attempted because of configuration.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::ToolDisabled(_))
    }
}
