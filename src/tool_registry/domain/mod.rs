//! Domain model for tool endpoint configuration.
//!
//! The tool registry domain models logical tool identity, the physical
//! endpoint each tool is served from, and the gateway configuration those
//! endpoints are resolved from. Infrastructure concerns remain outside this
//! boundary.

mod config;
mod endpoint;
mod error;
mod ids;

pub use config::{DEFAULT_POOL_SIZE, GatewayConfig, ResilienceSettings, ToolEndpointConfig};
pub use endpoint::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS, ToolEndpoint, ToolEndpointPatch};
pub use error::ToolRegistryDomainError;
pub use ids::{EndpointKey, ToolId};
