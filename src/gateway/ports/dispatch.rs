//! Inbound dispatch contract.

use crate::gateway::domain::GatewayResponse;
use async_trait::async_trait;

/// Calls a remote tool and reports the outcome as an envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolDispatch: Send + Sync {
    /// Sends `message` on behalf of `user_id` to the tool `tool_id`.
    ///
    /// Never fails; failures are represented in the returned envelope.
    async fn call_tool(&self, tool_id: &str, message: &str, user_id: &str) -> GatewayResponse;
}
