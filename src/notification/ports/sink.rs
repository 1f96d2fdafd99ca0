//! Outbound notification delivery contract.

use crate::notification::domain::UserEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for notification delivery.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Delivers events to a user's real-time channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends `event` to every connection of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the event could not be delivered.
    async fn emit_to_user(&self, user_id: &str, event: &UserEvent) -> NotificationResult<()>;
}

/// Errors returned by notification sinks.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The relay is not accepting events.
    #[error("notification relay unavailable: {0}")]
    Unavailable(String),
}
