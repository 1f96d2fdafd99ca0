//! Gateway configuration model as read from a configuration source.

use super::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS, ToolEndpoint, ToolId, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default number of idle clients kept per endpoint key.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Top-level gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Timeout for tools that do not configure their own.
    pub default_timeout_ms: u64,
    /// Retry budget for tools that do not configure their own.
    pub default_retries: u32,
    /// Idle client capacity per endpoint key.
    pub connection_pool_size: usize,
    /// Backoff and circuit breaker tuning.
    pub resilience: ResilienceSettings,
    /// Configured tools.
    pub tools: Vec<ToolEndpointConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_retries: DEFAULT_MAX_RETRIES,
            connection_pool_size: DEFAULT_POOL_SIZE,
            resilience: ResilienceSettings::default(),
            tools: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Adds a tool entry.
    #[must_use]
    pub fn with_tool(mut self, tool: ToolEndpointConfig) -> Self {
        self.tools.push(tool);
        self
    }

    /// Validates global settings that are fixed for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] for a zero pool size or a zero
    /// breaker threshold.
    pub const fn validate_globals(&self) -> Result<(), ToolRegistryDomainError> {
        if self.connection_pool_size == 0 {
            return Err(ToolRegistryDomainError::ZeroPoolSize);
        }
        if self.resilience.failure_threshold == 0 {
            return Err(ToolRegistryDomainError::ZeroFailureThreshold);
        }
        Ok(())
    }

    /// Resolves tool entries against the global defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when an entry is invalid or two
    /// entries share an identifier.
    pub fn resolve_endpoints(&self) -> Result<Vec<ToolEndpoint>, ToolRegistryDomainError> {
        let mut seen = HashSet::with_capacity(self.tools.len());
        let mut endpoints = Vec::with_capacity(self.tools.len());
        for tool in &self.tools {
            let endpoint = tool.resolve(self.default_timeout_ms, self.default_retries)?;
            if !seen.insert(endpoint.id().clone()) {
                return Err(ToolRegistryDomainError::DuplicateToolId(
                    endpoint.id().clone(),
                ));
            }
            endpoints.push(endpoint);
        }
        Ok(endpoints)
    }
}

/// One `[[tools]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEndpointConfig {
    /// Logical tool identifier.
    pub id: String,
    /// Display name; defaults to the identifier.
    #[serde(default)]
    pub name: Option<String>,
    /// Network address.
    pub address: String,
    /// Network port.
    pub port: u16,
    /// Per-attempt deadline override.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Retry budget override.
    #[serde(default)]
    pub retries: Option<u32>,
    /// Whether dispatch is allowed.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

impl ToolEndpointConfig {
    /// Creates an enabled entry without overrides.
    #[must_use]
    pub fn new(id: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            name: None,
            address: address.into(),
            port,
            timeout_ms: None,
            retries: None,
            enabled: true,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the timeout override.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the retry override.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn resolve(
        &self,
        default_timeout_ms: u64,
        default_retries: u32,
    ) -> Result<ToolEndpoint, ToolRegistryDomainError> {
        let id = ToolId::new(self.id.as_str())?;
        let name = self.name.clone().unwrap_or_else(|| id.as_str().to_owned());
        Ok(ToolEndpoint::new(id, name, self.address.as_str(), self.port)?
            .with_timeout_ms(self.timeout_ms.unwrap_or(default_timeout_ms))?
            .with_max_retries(self.retries.unwrap_or(default_retries))
            .with_enabled(self.enabled))
    }
}

/// Backoff and circuit breaker tuning shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Upper bound for any single backoff delay.
    pub max_delay_ms: u64,
    /// Growth factor applied per attempt.
    pub backoff_multiplier: u32,
    /// Consecutive failures that open an endpoint's breaker.
    pub failure_threshold: u32,
    /// Time after the last failure before an open breaker admits calls.
    pub cooldown_ms: u64,
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2,
            failure_threshold: 5,
            cooldown_ms: 30_000,
        }
    }
}
