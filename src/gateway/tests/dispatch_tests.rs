//! Dispatch flow: validation, retries, timeouts and circuit breaking.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    connection::adapters::{InMemoryToolBackend, ToolBehaviour},
    gateway::{ports::ToolDispatch, services::GatewayDispatcher},
    resilience::domain::RetryOverrides,
    test_support::ManualClock,
    tool_registry::{
        adapters::StaticToolConfigSource,
        domain::{EndpointKey, GatewayConfig, ToolEndpointConfig},
    },
};
use chrono::TimeDelta;
use rstest::{fixture, rstest};

type TestDispatcher = GatewayDispatcher<StaticToolConfigSource, InMemoryToolBackend, ManualClock>;

struct Harness {
    dispatcher: TestDispatcher,
    backend: InMemoryToolBackend,
    clock: Arc<ManualClock>,
}

fn config() -> GatewayConfig {
    GatewayConfig::default()
        .with_tool(ToolEndpointConfig::new("t1", "localhost", 50051).with_timeout_ms(500))
        .with_tool(ToolEndpointConfig::new("t2", "localhost", 50052).with_enabled(false))
        .with_tool(ToolEndpointConfig::new("t3", "localhost", 50053).with_retries(0))
}

#[fixture]
fn harness() -> Harness {
    let backend = InMemoryToolBackend::new();
    let clock = Arc::new(ManualClock::new());
    let dispatcher = GatewayDispatcher::new(
        StaticToolConfigSource::new(config()),
        Arc::new(backend.clone()),
        Arc::clone(&clock),
    )
    .expect("valid configuration");
    Harness {
        dispatcher,
        backend,
        clock,
    }
}

fn key(port: u16) -> EndpointKey {
    EndpointKey::new("localhost", port)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn enabled_tool_returns_success_envelope(harness: Harness) {
    let response = harness.dispatcher.call_tool("t1", "hello", "u1").await;

    assert!(response.success);
    assert_eq!(response.data.as_deref(), Some("hello"));
    assert_eq!(response.error, None);
    assert_eq!(response.tool_id, "t1");

    let metrics = harness.dispatcher.metrics();
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.successful_requests, 1);
    assert_eq!(
        harness.dispatcher.connection_pool_stats().get(&key(50051)),
        Some(&1)
    );
}

#[rstest]
#[case("missing", "Unknown tool")]
#[case("   ", "Unknown tool")]
#[case(" t1 ", "Unknown tool")]
#[case("T1", "Unknown tool")]
#[case("t2", "Tool is disabled")]
#[tokio::test(flavor = "multi_thread")]
async fn configuration_errors_never_reach_the_endpoint(
    harness: Harness,
    #[case] tool_id: &str,
    #[case] expected: &str,
) {
    let response = harness.dispatcher.call_tool(tool_id, "hello", "u1").await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(expected));
    assert_eq!(response.tool_id, tool_id);
    assert_eq!(harness.backend.calls(&key(50051)), 0);
    assert_eq!(harness.backend.calls(&key(50052)), 0);
    assert_eq!(harness.dispatcher.metrics().total_requests, 0);
    assert!(harness.dispatcher.circuit_breaker_stats().is_empty());
    assert!(harness.dispatcher.connection_pool_stats().is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_until_success(harness: Harness) {
    harness.backend.script(
        &key(50051),
        [
            ToolBehaviour::Fail("unavailable".to_owned()),
            ToolBehaviour::Fail("unavailable".to_owned()),
        ],
    );

    let response = harness.dispatcher.call_tool("t1", "hello", "u1").await;

    assert!(response.success);
    assert_eq!(harness.backend.calls(&key(50051)), 3);
    assert!(response.duration_ms >= 3_000);
    let stats = harness.dispatcher.circuit_breaker_stats();
    assert_eq!(stats.get(&key(50051)).map(|entry| entry.failure_count), Some(0));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_last_error(harness: Harness) {
    harness
        .backend
        .set_behaviour(&key(50051), ToolBehaviour::Fail("boom".to_owned()));

    let response = harness.dispatcher.call_tool("t1", "hello", "u1").await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("RPC error: boom"));
    assert_eq!(harness.backend.calls(&key(50051)), 4);
    let metrics = harness.dispatcher.metrics();
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.failed_requests, 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timeout_fails_the_attempt_and_returns_the_client(harness: Harness) {
    harness
        .backend
        .set_behaviour(&key(50051), ToolBehaviour::Stall(Duration::from_secs(5)));
    let overrides = RetryOverrides::default().with_max_retries(0);

    let response = harness
        .dispatcher
        .call_tool_with_overrides("t1", "hello", "u1", Some(&overrides))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Request timeout"));
    assert!(response.duration_ms >= 500);
    assert!(response.duration_ms < 5_000);
    assert_eq!(
        harness.dispatcher.connection_pool_stats().get(&key(50051)),
        Some(&1)
    );
    assert_eq!(harness.dispatcher.metrics().failed_requests, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn breaker_opens_after_threshold_and_recovers_after_cooldown(harness: Harness) {
    harness
        .backend
        .set_behaviour(&key(50053), ToolBehaviour::Fail("down".to_owned()));
    for _ in 0..5 {
        let response = harness.dispatcher.call_tool("t3", "hello", "u1").await;
        assert_eq!(response.error.as_deref(), Some("RPC error: down"));
    }

    let rejected = harness.dispatcher.call_tool("t3", "hello", "u1").await;

    assert_eq!(
        rejected.error.as_deref(),
        Some("Circuit breaker is open for tool t3")
    );
    assert_eq!(harness.backend.calls(&key(50053)), 5);
    assert_eq!(harness.dispatcher.metrics().total_requests, 6);

    harness
        .backend
        .set_behaviour(&key(50053), ToolBehaviour::Echo);
    harness.clock.advance(TimeDelta::seconds(30));
    let still_open = harness.dispatcher.call_tool("t3", "hello", "u1").await;
    assert!(!still_open.success);

    harness.clock.advance(TimeDelta::seconds(1));
    let recovered = harness.dispatcher.call_tool("t3", "hello", "u1").await;
    assert!(recovered.success);
    let stats = harness.dispatcher.circuit_breaker_stats();
    let entry = stats.get(&key(50053)).expect("breaker entry");
    assert!(!entry.is_open);
    assert_eq!(entry.failure_count, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatcher_serves_the_dispatch_port(harness: Harness) {
    let port: &dyn ToolDispatch = &harness.dispatcher;

    let response = port.call_tool("t1", "ping", "u9").await;

    assert_eq!(response.data.as_deref(), Some("ping"));
}
