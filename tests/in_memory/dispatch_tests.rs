//! End-to-end dispatch through the in-memory backend.

use super::helpers::{Gateway, gateway, local};
use mockable::Clock;
use rstest::rstest;
use std::sync::Arc;
use switchyard::{connection::adapters::ToolBehaviour, metrics::domain::HealthStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn enabled_tool_answers_with_success_envelope(gateway: Gateway) {
    let response = gateway.dispatcher.call_tool("t1", "hello", "u1").await;

    assert!(response.success);
    assert_eq!(response.tool_id, "t1");
    assert_eq!(response.data.as_deref(), Some("hello"));
    assert_eq!(response.timestamp, gateway.clock.utc());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_tool_is_rejected_without_dispatch(gateway: Gateway) {
    let response = gateway.dispatcher.call_tool("t2", "hello", "u1").await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Tool is disabled"));
    assert_eq!(gateway.backend.calls(&local(50052)), 0);
    assert_eq!(gateway.backend.clients_created(&local(50052)), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_dispatches_share_the_pool(gateway: Gateway) {
    let handles: Vec<_> = (0..16)
        .map(|index| {
            let dispatcher = Arc::clone(&gateway.dispatcher);
            tokio::spawn(async move {
                dispatcher
                    .call_tool("t1", &format!("message {index}"), "u1")
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.expect("dispatch task should not panic");
        assert!(response.success);
    }

    let metrics = gateway.dispatcher.metrics();
    assert_eq!(metrics.total_requests, 16);
    assert_eq!(metrics.successful_requests, 16);
    let idle = gateway
        .dispatcher
        .connection_pool_stats()
        .get(&local(50051))
        .copied()
        .unwrap_or_default();
    assert!(idle >= 1);
    assert!(idle <= 10);
    assert!(gateway.backend.clients_created(&local(50051)) <= 16);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_tool_degrades_health(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Fail("down".to_owned()));
    for _ in 0..9 {
        gateway.dispatcher.call_tool("t1", "hello", "u1").await;
    }
    gateway.dispatcher.call_tool("t3", "hello", "u1").await;

    let report = gateway.dispatcher.health_status();

    assert_eq!(report.status, HealthStatus::Degraded);
    assert_eq!(report.success_rate, 90.0);
}
