//! Queue consumer that dispatches jobs and reports progress to users.

use crate::{
    gateway::{domain::GatewayResponse, ports::ToolDispatch},
    notification::{
        domain::{AiResponse, Notice, ToolJob, UserEvent},
        ports::NotificationSink,
    },
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Consumes [`ToolJob`]s and forwards each outcome to the requesting user.
pub struct DispatchWorker<D, N>
where
    D: ToolDispatch,
    N: NotificationSink,
{
    dispatch: Arc<D>,
    sink: Arc<N>,
}

impl<D, N> DispatchWorker<D, N>
where
    D: ToolDispatch,
    N: NotificationSink,
{
    /// Creates a worker dispatching through `dispatch` and notifying through
    /// `sink`.
    #[must_use]
    pub const fn new(dispatch: Arc<D>, sink: Arc<N>) -> Self {
        Self { dispatch, sink }
    }

    /// Processes jobs until every sender is dropped, returning how many were
    /// processed.
    pub async fn run(&self, mut jobs: mpsc::Receiver<ToolJob>) -> usize {
        let mut processed = 0_usize;
        while let Some(job) = jobs.recv().await {
            self.process(&job).await;
            processed += 1;
        }
        info!(processed, "dispatch worker stopped");
        processed
    }

    /// Dispatches one job, emitting a started notice, the reply, and a
    /// completion notice to the job's user.
    pub async fn process(&self, job: &ToolJob) -> GatewayResponse {
        debug!(request_id = %job.request_id, tool_id = %job.tool_id, "processing job");
        self.emit(
            job,
            UserEvent::Notification(Notice::started(job.request_id, job.tool_id.as_str())),
        )
        .await;

        let response = self
            .dispatch
            .call_tool(&job.tool_id, &job.message, &job.user_id)
            .await;

        self.emit(
            job,
            UserEvent::AiResponse(AiResponse {
                request_id: job.request_id,
                user_id: job.user_id.clone(),
                response: response.clone(),
            }),
        )
        .await;
        self.emit(
            job,
            UserEvent::Notification(Notice::completed(job.request_id, &response)),
        )
        .await;
        response
    }

    async fn emit(&self, job: &ToolJob, event: UserEvent) {
        if let Err(err) = self.sink.emit_to_user(&job.user_id, &event).await {
            warn!(
                request_id = %job.request_id,
                user_id = %job.user_id,
                event = event.name(),
                error = %err,
                "notification delivery failed"
            );
        }
    }
}
