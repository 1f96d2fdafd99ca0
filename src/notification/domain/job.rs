//! Queued request to call a tool on behalf of a user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tool call waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolJob {
    /// Correlates the notifications emitted for this job.
    pub request_id: Uuid,
    /// User the results are delivered to.
    pub user_id: String,
    /// Tool to call.
    pub tool_id: String,
    /// Payload forwarded to the tool.
    pub message: String,
}

impl ToolJob {
    /// Creates a job with a fresh request identifier.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        tool_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: user_id.into(),
            tool_id: tool_id.into(),
            message: message.into(),
        }
    }
}
