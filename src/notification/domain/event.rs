//! Events pushed to a user while their job is processed.

use crate::gateway::domain::GatewayResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel event name for notices.
pub const NOTIFICATION_EVENT: &str = "notification";
/// Channel event name for tool replies.
pub const AI_RESPONSE_EVENT: &str = "ai_response";

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Progress update.
    Info,
    /// The job completed successfully.
    Success,
    /// The job failed.
    Error,
}

/// Human-readable progress notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Job the notice belongs to.
    pub request_id: Uuid,
    /// Tool the job addressed.
    pub tool_id: String,
}

impl Notice {
    /// Builds the notice sent before dispatch.
    #[must_use]
    pub fn started(request_id: Uuid, tool_id: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: "AI Request Started".to_owned(),
            message: "Your AI request is being processed.".to_owned(),
            request_id,
            tool_id: tool_id.into(),
        }
    }

    /// Builds the notice sent after dispatch from its envelope.
    #[must_use]
    pub fn completed(request_id: Uuid, response: &GatewayResponse) -> Self {
        let (kind, message) = if response.success {
            (
                NoticeKind::Success,
                "Your AI request has been processed.".to_owned(),
            )
        } else {
            let error = response.error.as_deref().unwrap_or("Unknown error");
            (NoticeKind::Error, format!("Error: {error}"))
        };
        Self {
            kind,
            title: "AI Request Completed".to_owned(),
            message,
            request_id,
            tool_id: response.tool_id.clone(),
        }
    }
}

/// Tool reply delivered to the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    /// Job the reply belongs to.
    pub request_id: Uuid,
    /// Recipient.
    pub user_id: String,
    /// Dispatch envelope.
    pub response: GatewayResponse,
}

/// Event emitted to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum UserEvent {
    /// Progress notice.
    Notification(Notice),
    /// Tool reply.
    AiResponse(AiResponse),
}

impl UserEvent {
    /// Returns the channel event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Notification(_) => NOTIFICATION_EVENT,
            Self::AiResponse(_) => AI_RESPONSE_EVENT,
        }
    }
}
