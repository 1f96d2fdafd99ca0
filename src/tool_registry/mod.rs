//! Tool endpoint configuration and the runtime registry.
//!
//! Every remote tool the gateway can reach is described by a
//! [`domain::ToolEndpoint`]. The registry resolves endpoints from a
//! configuration source at startup, accepts partial updates at runtime and
//! swaps in a freshly read set on reload. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
