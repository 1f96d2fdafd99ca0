//! Environment-variable overrides layered over another source.

use crate::tool_registry::{
    domain::GatewayConfig,
    ports::{ToolConfigSource, ToolConfigSourceError, ToolConfigSourceResult},
};
use std::str::FromStr;

/// Overrides `default_timeout_ms`.
pub const GATEWAY_TIMEOUT_VAR: &str = "GATEWAY_TIMEOUT";
/// Overrides `default_retries`.
pub const GATEWAY_RETRIES_VAR: &str = "GATEWAY_RETRIES";
/// Overrides `connection_pool_size`.
pub const GATEWAY_POOL_SIZE_VAR: &str = "GATEWAY_POOL_SIZE";

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Applies `GATEWAY_*` environment overrides to the global settings of an
/// inner source.
pub struct EnvOverridingSource<S> {
    inner: S,
    lookup: Box<Lookup>,
}

impl<S: ToolConfigSource> EnvOverridingSource<S> {
    /// Wraps `inner`, reading overrides from the process environment.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_lookup(inner, |name| std::env::var(name).ok())
    }

    /// Wraps `inner`, reading overrides through `lookup`.
    #[must_use]
    pub fn with_lookup(
        inner: S,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            lookup: Box::new(lookup),
        }
    }

    fn parsed<T: FromStr>(&self, variable: &'static str) -> ToolConfigSourceResult<Option<T>> {
        let Some(raw) = (self.lookup)(variable) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| ToolConfigSourceError::InvalidOverride {
                variable,
                value: raw,
            })
    }
}

impl<S: ToolConfigSource> ToolConfigSource for EnvOverridingSource<S> {
    fn load(&self) -> ToolConfigSourceResult<GatewayConfig> {
        let mut config = self.inner.load()?;
        if let Some(timeout_ms) = self.parsed(GATEWAY_TIMEOUT_VAR)? {
            config.default_timeout_ms = timeout_ms;
        }
        if let Some(retries) = self.parsed(GATEWAY_RETRIES_VAR)? {
            config.default_retries = retries;
        }
        if let Some(pool_size) = self.parsed(GATEWAY_POOL_SIZE_VAR)? {
            config.connection_pool_size = pool_size;
        }
        Ok(config)
    }
}
