//! In-memory configuration source for tests and embedded setups.

use crate::tool_registry::{
    domain::GatewayConfig,
    ports::{ToolConfigSource, ToolConfigSourceResult},
};
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration source backed by a value held in memory.
///
/// Clones share the same value, so a test can keep a handle, call
/// [`StaticToolConfigSource::replace`], and then trigger a registry reload.
#[derive(Debug, Clone, Default)]
pub struct StaticToolConfigSource {
    config: Arc<RwLock<GatewayConfig>>,
}

impl StaticToolConfigSource {
    /// Creates a source serving `config`.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Replaces the configuration returned by subsequent loads.
    pub fn replace(&self, config: GatewayConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }
}

impl ToolConfigSource for StaticToolConfigSource {
    fn load(&self) -> ToolConfigSourceResult<GatewayConfig> {
        Ok(self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
