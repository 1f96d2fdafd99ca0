//! Shared test helpers for in-memory gateway integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Arc, Mutex, PoisonError};
use switchyard::{
    connection::adapters::InMemoryToolBackend,
    gateway::services::GatewayDispatcher,
    tool_registry::{
        adapters::StaticToolConfigSource,
        domain::{EndpointKey, GatewayConfig, ToolEndpointConfig},
    },
};

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Starts the clock at a fixed instant.
    ///
    /// # Panics
    ///
    /// Panics if the fixed start instant cannot be represented.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid fixed instant");
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Dispatcher wired to in-memory adapters.
pub type TestDispatcher =
    GatewayDispatcher<StaticToolConfigSource, InMemoryToolBackend, ManualClock>;

/// A dispatcher together with handles on its collaborators.
pub struct Gateway {
    /// The dispatcher under test.
    pub dispatcher: Arc<TestDispatcher>,
    /// Simulated remote tools.
    pub backend: InMemoryToolBackend,
    /// Configuration source shared with the dispatcher.
    pub source: StaticToolConfigSource,
    /// Clock driving breaker cooldowns and uptime.
    pub clock: Arc<ManualClock>,
}

/// Three tools: `t1` enabled, `t2` disabled, `t3` enabled without retries.
#[must_use]
pub fn standard_config() -> GatewayConfig {
    GatewayConfig::default()
        .with_tool(
            ToolEndpointConfig::new("t1", "localhost", 50051)
                .with_name("AI Tool 1")
                .with_timeout_ms(1_000),
        )
        .with_tool(ToolEndpointConfig::new("t2", "localhost", 50052).with_enabled(false))
        .with_tool(ToolEndpointConfig::new("t3", "localhost", 50053).with_retries(0))
}

/// Builds a gateway over `config`.
///
/// # Panics
///
/// Panics when `config` is invalid.
#[must_use]
pub fn build_gateway(config: GatewayConfig) -> Gateway {
    let backend = InMemoryToolBackend::new();
    let source = StaticToolConfigSource::new(config);
    let clock = Arc::new(ManualClock::new());
    let dispatcher = GatewayDispatcher::new(
        source.clone(),
        Arc::new(backend.clone()),
        Arc::clone(&clock),
    )
    .expect("valid configuration");
    Gateway {
        dispatcher: Arc::new(dispatcher),
        backend,
        source,
        clock,
    }
}

/// Provides a gateway over [`standard_config`].
#[fixture]
pub fn gateway() -> Gateway {
    build_gateway(standard_config())
}

/// Endpoint key for a local port.
#[must_use]
pub fn local(port: u16) -> EndpointKey {
    EndpointKey::new("localhost", port)
}
