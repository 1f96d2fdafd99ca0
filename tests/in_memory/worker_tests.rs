//! Queue worker driving a real dispatcher.

use super::helpers::{Gateway, gateway};
use rstest::rstest;
use std::sync::Arc;
use switchyard::notification::{
    adapters::InMemoryNotificationSink,
    domain::{NoticeKind, ToolJob, UserEvent},
    services::DispatchWorker,
};
use tokio::sync::mpsc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queued_jobs_are_dispatched_and_reported(gateway: Gateway) {
    let sink = InMemoryNotificationSink::new();
    let worker = DispatchWorker::new(Arc::clone(&gateway.dispatcher), Arc::new(sink.clone()));
    let (sender, receiver) = mpsc::channel(8);
    let running = tokio::spawn(async move { worker.run(receiver).await });

    let ok_job = ToolJob::new("alice", "t1", "hello");
    let disabled_job = ToolJob::new("bob", "t2", "hello");
    sender.send(ok_job.clone()).await.expect("worker should be running");
    sender
        .send(disabled_job.clone())
        .await
        .expect("worker should be running");
    drop(sender);

    let processed = running.await.expect("worker should not panic");
    assert_eq!(processed, 2);

    let alice = sink.events_for("alice");
    assert_eq!(alice.len(), 3);
    let Some(UserEvent::AiResponse(reply)) = alice.get(1) else {
        panic!("expected ai_response for alice");
    };
    assert_eq!(reply.request_id, ok_job.request_id);
    assert_eq!(reply.response.data.as_deref(), Some("hello"));

    let bob = sink.events_for("bob");
    let Some(UserEvent::Notification(done)) = bob.last() else {
        panic!("expected completion notice for bob");
    };
    assert_eq!(done.kind, NoticeKind::Error);
    assert_eq!(done.message, "Error: Tool is disabled");
    assert_eq!(done.request_id, disabled_job.request_id);
    assert_eq!(gateway.dispatcher.metrics().total_requests, 1);
}
