//! Runtime tool registry built from a configuration source.
//!
//! The registry holds an immutable snapshot of resolved endpoints behind a
//! lock. Updates and reloads build a replacement snapshot and swap it in a
//! single assignment, so readers see either the old set or the new one.

use crate::tool_registry::{
    domain::{GatewayConfig, ToolEndpoint, ToolEndpointPatch, ToolId, ToolRegistryDomainError},
    ports::{ToolConfigSource, ToolConfigSourceError},
};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::info;

/// Service-level errors for registry operations.
#[derive(Debug, Clone, Error)]
pub enum ToolRegistryError {
    /// No tool exists with the given identifier.
    #[error("tool {0} not found")]
    NotFound(ToolId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ToolRegistryDomainError),
    /// The configuration source failed.
    #[error(transparent)]
    Source(#[from] ToolConfigSourceError),
}

/// Result type for registry operations.
pub type ToolRegistryResult<T> = Result<T, ToolRegistryError>;

type Snapshot = Arc<BTreeMap<ToolId, ToolEndpoint>>;

/// Mutable-at-runtime registry of tool endpoints.
pub struct ToolRegistry<S>
where
    S: ToolConfigSource,
{
    source: S,
    snapshot: RwLock<Snapshot>,
}

impl<S> ToolRegistry<S>
where
    S: ToolConfigSource,
{
    /// Loads the initial registry from `source`.
    ///
    /// Returns the registry together with the configuration it was built from
    /// so the caller can size the other components from the same read.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError`] when the source cannot be read or holds
    /// invalid entries. Such errors are fatal at startup.
    pub fn load(source: S) -> ToolRegistryResult<(Self, GatewayConfig)> {
        let config = source.load()?;
        config.validate_globals()?;
        let snapshot = build_snapshot(&config)?;
        let registry = Self {
            source,
            snapshot: RwLock::new(snapshot),
        };
        Ok((registry, config))
    }

    fn current(&self) -> Snapshot {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Finds a tool by identifier.
    #[must_use]
    pub fn lookup(&self, tool_id: &ToolId) -> Option<ToolEndpoint> {
        self.current().get(tool_id).cloned()
    }

    /// Returns every enabled tool ordered by identifier.
    #[must_use]
    pub fn list_enabled(&self) -> Vec<ToolEndpoint> {
        self.current()
            .values()
            .filter(|endpoint| endpoint.is_enabled())
            .cloned()
            .collect()
    }

    /// Returns every tool ordered by identifier.
    #[must_use]
    pub fn list_all(&self) -> Vec<ToolEndpoint> {
        self.current().values().cloned().collect()
    }

    /// Applies a partial update to one tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::NotFound`] for an unknown identifier and
    /// [`ToolRegistryError::Domain`] when the patched entry would be invalid.
    pub fn update(
        &self,
        tool_id: &ToolId,
        patch: &ToolEndpointPatch,
    ) -> ToolRegistryResult<ToolEndpoint> {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let existing = guard
            .get(tool_id)
            .ok_or_else(|| ToolRegistryError::NotFound(tool_id.clone()))?;
        let updated = existing.patched(patch)?;

        let mut replacement = BTreeMap::clone(&guard);
        replacement.insert(tool_id.clone(), updated.clone());
        *guard = Arc::new(replacement);

        info!(tool_id = %tool_id, enabled = updated.is_enabled(), "tool configuration updated");
        Ok(updated)
    }

    /// Re-reads the source and replaces every endpoint at once.
    ///
    /// On failure the current registry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError`] when the source cannot be read or holds
    /// invalid entries.
    pub fn reload(&self) -> ToolRegistryResult<()> {
        let config = self.source.load()?;
        let snapshot = build_snapshot(&config)?;
        let tool_count = snapshot.len();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        info!(tool_count, "tool registry reloaded");
        Ok(())
    }
}

fn build_snapshot(config: &GatewayConfig) -> Result<Snapshot, ToolRegistryDomainError> {
    let endpoints = config.resolve_endpoints()?;
    Ok(Arc::new(
        endpoints
            .into_iter()
            .map(|endpoint| (endpoint.id().clone(), endpoint))
            .collect(),
    ))
}
