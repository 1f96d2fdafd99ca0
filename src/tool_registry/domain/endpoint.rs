//! Tool endpoint configuration aggregate and its partial-update payload.

use super::{EndpointKey, ToolId, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout applied when neither the tool nor the gateway configures one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Retry budget applied when neither the tool nor the gateway configures one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Resolved configuration for one remote tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEndpoint {
    id: ToolId,
    name: String,
    address: String,
    port: u16,
    timeout_ms: u64,
    max_retries: u32,
    enabled: bool,
}

impl ToolEndpoint {
    /// Creates an enabled endpoint with default timeout and retry budget.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name or address is blank
    /// or the port is zero.
    pub fn new(
        id: ToolId,
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
    ) -> Result<Self, ToolRegistryDomainError> {
        let endpoint = Self {
            id,
            name: name.into().trim().to_owned(),
            address: address.into().trim().to_owned(),
            port,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            enabled: true,
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// Sets the per-attempt deadline in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::ZeroTimeout`] for a zero timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ToolRegistryDomainError> {
        self.timeout_ms = timeout_ms;
        self.validate()?;
        Ok(self)
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the tool identifier.
    #[must_use]
    pub const fn id(&self) -> &ToolId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the network address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the network port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the per-attempt deadline in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the per-attempt deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns whether dispatch to this tool is allowed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the pooling and circuit-breaking key.
    #[must_use]
    pub fn endpoint_key(&self) -> EndpointKey {
        EndpointKey::new(&self.address, self.port)
    }

    /// Returns a copy with every field present in `patch` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the patched endpoint would be
    /// invalid; `self` is left untouched.
    pub fn patched(&self, patch: &ToolEndpointPatch) -> Result<Self, ToolRegistryDomainError> {
        let mut updated = self.clone();
        if let Some(name) = &patch.name {
            name.trim().clone_into(&mut updated.name);
        }
        if let Some(address) = &patch.address {
            address.trim().clone_into(&mut updated.address);
        }
        if let Some(port) = patch.port {
            updated.port = port;
        }
        if let Some(timeout_ms) = patch.timeout_ms {
            updated.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = patch.max_retries {
            updated.max_retries = max_retries;
        }
        if let Some(enabled) = patch.enabled {
            updated.enabled = enabled;
        }
        updated.validate()?;
        Ok(updated)
    }

    fn validate(&self) -> Result<(), ToolRegistryDomainError> {
        if self.name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName(self.id.clone()));
        }
        if self.address.is_empty() {
            return Err(ToolRegistryDomainError::EmptyAddress(self.id.clone()));
        }
        if self.port == 0 {
            return Err(ToolRegistryDomainError::ZeroPort(self.id.clone()));
        }
        if self.timeout_ms == 0 {
            return Err(ToolRegistryDomainError::ZeroTimeout(self.id.clone()));
        }
        Ok(())
    }
}

/// Partial update for a [`ToolEndpoint`]; absent fields are left unchanged.
///
/// The identifier is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolEndpointPatch {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement network address.
    pub address: Option<String>,
    /// Replacement network port.
    pub port: Option<u16>,
    /// Replacement per-attempt deadline in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Replacement retry budget.
    pub max_retries: Option<u32>,
    /// Replacement enabled flag.
    pub enabled: Option<bool>,
}

impl ToolEndpointPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the per-attempt deadline.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the address and port together.
    #[must_use]
    pub fn with_target(mut self, address: impl Into<String>, port: u16) -> Self {
        self.address = Some(address.into());
        self.port = Some(port);
        self
    }
}
