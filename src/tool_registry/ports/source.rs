//! Configuration source port read at startup and on reload.

use crate::tool_registry::domain::GatewayConfig;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration source operations.
pub type ToolConfigSourceResult<T> = Result<T, ToolConfigSourceError>;

/// Supplies the gateway configuration the registry is built from.
///
/// Implementations are read synchronously; a reload never suspends the
/// caller on network I/O.
pub trait ToolConfigSource: Send + Sync {
    /// Reads the current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ToolConfigSourceError`] when the configuration cannot be
    /// read or decoded.
    fn load(&self) -> ToolConfigSourceResult<GatewayConfig>;
}

/// Errors returned by configuration source adapters.
#[derive(Debug, Clone, Error)]
pub enum ToolConfigSourceError {
    /// The configuration could not be read.
    #[error("failed to read gateway configuration from {location}: {source}")]
    Read {
        /// Human-readable location of the configuration.
        location: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// The configuration was read but could not be decoded.
    #[error("invalid gateway configuration in {location}: {source}")]
    Decode {
        /// Human-readable location of the configuration.
        location: String,
        /// Underlying decoding failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// An environment override held a value that does not parse.
    #[error("environment variable {variable} has invalid value '{value}'")]
    InvalidOverride {
        /// Variable name.
        variable: &'static str,
        /// Raw value.
        value: String,
    },
}

impl ToolConfigSourceError {
    /// Wraps a read failure.
    #[must_use]
    pub fn read(location: impl Into<String>, err: std::io::Error) -> Self {
        Self::Read {
            location: location.into(),
            source: Arc::new(err),
        }
    }

    /// Wraps a decode failure.
    #[must_use]
    pub fn decode(
        location: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            location: location.into(),
            source: Arc::new(err),
        }
    }
}
