//! In-memory notification sink for tests.

use crate::notification::{
    domain::UserEvent,
    ports::{NotificationError, NotificationResult, NotificationSink},
};
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

/// Sink recording every delivered event in order.
///
/// Clones share the same record. Deliveries can be switched off to exercise
/// relay outages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    delivered: Arc<Mutex<Vec<(String, UserEvent)>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryNotificationSink {
    /// Creates an empty, available sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn delivered_guard(&self) -> MutexGuard<'_, Vec<(String, UserEvent)>> {
        self.delivered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes subsequent deliveries fail (`true`) or succeed (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns every delivered `(user_id, event)` pair in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<(String, UserEvent)> {
        self.delivered_guard().clone()
    }

    /// Returns the events delivered to `user_id` in delivery order.
    #[must_use]
    pub fn events_for(&self, user_id: &str) -> Vec<UserEvent> {
        self.delivered_guard()
            .iter()
            .filter(|(recipient, _)| recipient == user_id)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn emit_to_user(&self, user_id: &str, event: &UserEvent) -> NotificationResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NotificationError::Unavailable(user_id.to_owned()));
        }
        self.delivered_guard()
            .push((user_id.to_owned(), event.clone()));
        Ok(())
    }
}
