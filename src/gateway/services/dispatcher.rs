//! Dispatch façade over the registry, pool, resilience and metrics
//! components.

use crate::{
    connection::{
        ports::{ToolClientFactory, ToolReply, ToolRequest},
        services::ConnectionPool,
    },
    gateway::{
        domain::{DispatchError, GatewayResponse},
        ports::ToolDispatch,
    },
    metrics::{
        domain::{HealthReport, MetricsSnapshot, ToolUsageStat},
        services::MetricsAggregator,
    },
    resilience::{
        domain::{AttemptError, BreakerConfig, BreakerStats, RetryOverrides},
        services::{CircuitBreakerRegistry, RetryExecutor},
    },
    tool_registry::{
        domain::{EndpointKey, ToolEndpoint, ToolEndpointPatch, ToolId},
        ports::ToolConfigSource,
        services::{ToolRegistry, ToolRegistryResult},
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Resilient dispatcher for remote tool calls.
///
/// Owns the process-wide registry, connection pool, breaker registry and
/// metrics. Share it behind an [`Arc`] between callers.
pub struct GatewayDispatcher<S, F, C>
where
    S: ToolConfigSource,
    F: ToolClientFactory,
    C: Clock + Send + Sync,
{
    registry: ToolRegistry<S>,
    pool: ConnectionPool<F>,
    executor: RetryExecutor<C>,
    metrics: MetricsAggregator<C>,
    clock: Arc<C>,
}

impl<S, F, C> GatewayDispatcher<S, F, C>
where
    S: ToolConfigSource,
    F: ToolClientFactory,
    C: Clock + Send + Sync,
{
    /// Loads configuration from `source` and builds every component from it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::services::ToolRegistryError`] when the
    /// configuration cannot be read or is invalid. Startup must abort on
    /// this error.
    pub fn new(source: S, factory: Arc<F>, clock: Arc<C>) -> ToolRegistryResult<Self> {
        let (registry, config) = ToolRegistry::load(source)?;
        let breakers = Arc::new(CircuitBreakerRegistry::new(
            BreakerConfig::from_settings(&config.resilience),
            Arc::clone(&clock),
        ));
        info!(
            tools = registry.list_all().len(),
            pool_size = config.connection_pool_size,
            "gateway dispatcher initialised"
        );
        Ok(Self {
            registry,
            pool: ConnectionPool::new(factory, config.connection_pool_size),
            executor: RetryExecutor::new(breakers, config.resilience),
            metrics: MetricsAggregator::new(Arc::clone(&clock)),
            clock,
        })
    }

    /// Dispatches one call with the endpoint's own retry policy.
    pub async fn call_tool(&self, tool_id: &str, message: &str, user_id: &str) -> GatewayResponse {
        self.call_tool_with_overrides(tool_id, message, user_id, None)
            .await
    }

    /// Dispatches one call, replacing parts of the retry policy for this call
    /// only.
    pub async fn call_tool_with_overrides(
        &self,
        tool_id: &str,
        message: &str,
        user_id: &str,
        overrides: Option<&RetryOverrides>,
    ) -> GatewayResponse {
        let started = Instant::now();
        let endpoint = match self.resolve(tool_id) {
            Ok(endpoint) => endpoint,
            Err(err) => return self.envelope(tool_id, Err(err), started),
        };

        self.metrics.record_request(endpoint.id());
        let request = ToolRequest::new(message, user_id);
        let outcome = self
            .executor
            .execute(&endpoint, overrides, |_attempt| {
                self.attempt(&endpoint, &request)
            })
            .await
            .map(|reply| reply.response)
            .map_err(DispatchError::from);

        let response = self.envelope(tool_id, outcome, started);
        self.metrics.record_response(&response);
        debug!(
            tool_id,
            success = response.success,
            duration_ms = response.duration_ms,
            "dispatch finished"
        );
        response
    }

    fn resolve(&self, tool_id: &str) -> Result<ToolEndpoint, DispatchError> {
        let endpoint = ToolId::new(tool_id)
            .ok()
            .filter(|id| id.as_str() == tool_id)
            .and_then(|id| self.registry.lookup(&id))
            .ok_or_else(|| DispatchError::UnknownTool(tool_id.to_owned()))?;
        if !endpoint.is_enabled() {
            return Err(DispatchError::ToolDisabled(tool_id.to_owned()));
        }
        Ok(endpoint)
    }

    async fn attempt(
        &self,
        endpoint: &ToolEndpoint,
        request: &ToolRequest,
    ) -> Result<ToolReply, AttemptError> {
        let mut lease = self.pool.acquire(endpoint)?;
        let deadline = endpoint.timeout();
        match tokio::time::timeout(deadline, lease.process_message(request)).await {
            Ok(reply) => Ok(reply?),
            Err(_elapsed) => Err(AttemptError::Timeout(deadline)),
        }
    }

    fn envelope(
        &self,
        tool_id: &str,
        outcome: Result<String, DispatchError>,
        started: Instant,
    ) -> GatewayResponse {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let timestamp = self.clock.utc();
        match outcome {
            Ok(data) => GatewayResponse::succeeded(tool_id, data, timestamp, duration_ms),
            Err(err) => {
                if err.is_configuration_error() {
                    debug!(tool_id, error = %err, "dispatch rejected");
                } else {
                    warn!(tool_id, error = %err, "dispatch failed");
                }
                GatewayResponse::failed(tool_id, &err, timestamp, duration_ms)
            }
        }
    }

    /// Returns the current health verdict and its inputs.
    #[must_use]
    pub fn health_status(&self) -> HealthReport {
        self.metrics.health_report()
    }

    /// Returns a copy of the request counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Returns each tool's request count and share of all requests.
    #[must_use]
    pub fn tool_usage_stats(&self) -> BTreeMap<ToolId, ToolUsageStat> {
        self.metrics.tool_usage_stats()
    }

    /// Returns requests per second since start or the last metrics reset.
    #[must_use]
    pub fn request_rate(&self) -> f64 {
        self.metrics.request_rate()
    }

    /// Clears every request counter and restarts uptime.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Returns breaker state for every endpoint key seen so far.
    #[must_use]
    pub fn circuit_breaker_stats(&self) -> BTreeMap<EndpointKey, BreakerStats> {
        self.executor.breakers().stats()
    }

    /// Returns the number of idle clients per endpoint key.
    #[must_use]
    pub fn connection_pool_stats(&self) -> BTreeMap<EndpointKey, usize> {
        self.pool.stats()
    }

    /// Returns every enabled tool ordered by identifier.
    #[must_use]
    pub fn enabled_tools(&self) -> Vec<ToolEndpoint> {
        self.registry.list_enabled()
    }

    /// Applies a partial update to one tool's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::services::ToolRegistryError::NotFound`]
    /// for an unknown tool, or a validation error when the patched entry
    /// would be invalid.
    pub fn update_tool_config(
        &self,
        tool_id: &ToolId,
        patch: &ToolEndpointPatch,
    ) -> ToolRegistryResult<ToolEndpoint> {
        self.registry.update(tool_id, patch)
    }

    /// Re-reads tool endpoints from the configuration source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::tool_registry::services::ToolRegistryError`] when the
    /// source fails; the current endpoints stay in place.
    pub fn reload_config(&self) -> ToolRegistryResult<()> {
        self.registry.reload()
    }

    /// Closes the breaker for one endpoint key.
    pub fn reset_circuit_breaker(&self, key: &EndpointKey) {
        self.executor.breakers().reset(key);
    }

    /// Closes every idle pooled client.
    pub fn close_connections(&self) {
        self.pool.close_all();
    }
}

#[async_trait]
impl<S, F, C> ToolDispatch for GatewayDispatcher<S, F, C>
where
    S: ToolConfigSource,
    F: ToolClientFactory,
    C: Clock + Send + Sync,
{
    async fn call_tool(&self, tool_id: &str, message: &str, user_id: &str) -> GatewayResponse {
        Self::call_tool(self, tool_id, message, user_id).await
    }
}
