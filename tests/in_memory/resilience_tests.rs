//! Retry budgets, deadlines and circuit breaking across whole dispatches.

use super::helpers::{Gateway, build_gateway, gateway, local};
use chrono::TimeDelta;
use rstest::rstest;
use std::time::Duration;
use switchyard::{
    connection::adapters::ToolBehaviour,
    resilience::domain::RetryOverrides,
    tool_registry::domain::{EndpointKey, GatewayConfig, ToolEndpointConfig},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn breaker_sheds_load_until_cooldown_elapses(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Fail("unavailable".to_owned()));
    for _ in 0..5 {
        let response = gateway.dispatcher.call_tool("t3", "hello", "u1").await;
        assert_eq!(response.error.as_deref(), Some("RPC error: unavailable"));
    }

    let shed = gateway.dispatcher.call_tool("t3", "hello", "u1").await;

    assert_eq!(
        shed.error.as_deref(),
        Some("Circuit breaker is open for tool t3")
    );
    assert_eq!(gateway.backend.calls(&local(50053)), 5);
    let stats = gateway.dispatcher.circuit_breaker_stats();
    let entry = stats.get(&local(50053)).expect("breaker entry");
    assert!(entry.is_open);
    assert_eq!(entry.failure_count, 5);

    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Echo);
    gateway.clock.advance(TimeDelta::seconds(31));

    let recovered = gateway.dispatcher.call_tool("t3", "hello", "u1").await;
    assert!(recovered.success);
    assert_eq!(gateway.backend.calls(&local(50053)), 6);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failure_after_cooldown_restarts_the_count(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Fail("down".to_owned()));
    for _ in 0..5 {
        gateway.dispatcher.call_tool("t3", "hello", "u1").await;
    }
    gateway.clock.advance(TimeDelta::seconds(31));

    let response = gateway.dispatcher.call_tool("t3", "hello", "u1").await;

    assert_eq!(response.error.as_deref(), Some("RPC error: down"));
    assert_eq!(gateway.backend.calls(&local(50053)), 6);
    let stats = gateway.dispatcher.circuit_breaker_stats();
    let entry = stats.get(&local(50053)).expect("breaker entry");
    assert!(!entry.is_open);
    assert_eq!(entry.failure_count, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operator_reset_by_key_reopens_traffic_before_cooldown(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Fail("down".to_owned()));
    for _ in 0..5 {
        gateway.dispatcher.call_tool("t3", "hello", "u1").await;
    }
    gateway
        .backend
        .set_behaviour(&local(50053), ToolBehaviour::Echo);

    gateway
        .dispatcher
        .reset_circuit_breaker(&EndpointKey::from_raw("localhost:50053"));
    let response = gateway.dispatcher.call_tool("t3", "hello", "u1").await;

    assert!(response.success);
    let stats = gateway.dispatcher.circuit_breaker_stats();
    assert_eq!(stats.get(&local(50053)).map(|entry| entry.failure_count), Some(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tools_on_one_endpoint_share_a_breaker() {
    let gateway = build_gateway(
        GatewayConfig::default()
            .with_tool(ToolEndpointConfig::new("t4", "localhost", 50060).with_retries(0))
            .with_tool(ToolEndpointConfig::new("t5", "localhost", 50060).with_retries(0)),
    );
    gateway
        .backend
        .set_behaviour(&local(50060), ToolBehaviour::Fail("down".to_owned()));
    for _ in 0..5 {
        gateway.dispatcher.call_tool("t4", "hello", "u1").await;
    }

    let response = gateway.dispatcher.call_tool("t5", "hello", "u1").await;

    assert_eq!(
        response.error.as_deref(),
        Some("Circuit breaker is open for tool t5")
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn admitted_dispatch_keeps_retrying_after_breaker_opens(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50051), ToolBehaviour::Fail("flaky".to_owned()));

    let first = gateway.dispatcher.call_tool("t1", "hello", "u1").await;
    let second = gateway.dispatcher.call_tool("t1", "hello", "u1").await;
    let third = gateway.dispatcher.call_tool("t1", "hello", "u1").await;

    assert_eq!(first.error.as_deref(), Some("RPC error: flaky"));
    assert_eq!(second.error.as_deref(), Some("RPC error: flaky"));
    assert_eq!(
        third.error.as_deref(),
        Some("Circuit breaker is open for tool t1")
    );
    assert_eq!(gateway.backend.calls(&local(50051)), 8);
    let stats = gateway.dispatcher.circuit_breaker_stats();
    assert_eq!(stats.get(&local(50051)).map(|entry| entry.failure_count), Some(8));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timed_out_attempt_is_retried_after_backoff(gateway: Gateway) {
    gateway
        .backend
        .script(&local(50051), [ToolBehaviour::Stall(Duration::from_secs(60))]);

    let response = gateway.dispatcher.call_tool("t1", "hello", "u1").await;

    assert!(response.success);
    assert_eq!(gateway.backend.calls(&local(50051)), 2);
    assert!(response.duration_ms >= 2_000);
    assert!(response.duration_ms < 60_000);
    assert_eq!(
        gateway.dispatcher.connection_pool_stats().get(&local(50051)),
        Some(&1)
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn per_call_overrides_replace_the_retry_budget(gateway: Gateway) {
    gateway
        .backend
        .set_behaviour(&local(50051), ToolBehaviour::Fail("down".to_owned()));
    let overrides = RetryOverrides::default()
        .with_max_retries(1)
        .with_base_delay(Duration::from_millis(10));

    let response = gateway
        .dispatcher
        .call_tool_with_overrides("t1", "hello", "u1", Some(&overrides))
        .await;

    assert!(!response.success);
    assert_eq!(gateway.backend.calls(&local(50051)), 2);
    assert!(response.duration_ms < 1_000);
}
