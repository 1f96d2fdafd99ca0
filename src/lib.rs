//! Switchyard: resilient dispatch gateway for remote tools.
//!
//! This crate routes calls to remotely hosted tools, identified by a logical
//! tool id, over pooled client connections. Each call is protected by a
//! per-call deadline, bounded retries with exponential backoff, and a
//! per-endpoint circuit breaker, and every outcome is folded into process
//! metrics and a derived health verdict.
//!
//! # Architecture
//!
//! Switchyard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, sockets, memory)
//!
//! # Modules
//!
//! - [`tool_registry`]: Tool endpoint configuration and the runtime registry
//! - [`connection`]: Outbound tool clients and per-endpoint pooling
//! - [`resilience`]: Retry with backoff and circuit breaking
//! - [`metrics`]: Request counters and health derivation
//! - [`gateway`]: The dispatch façade and its admin operations
//! - [`notification`]: Queue worker forwarding replies to users

pub mod connection;
pub mod gateway;
pub mod metrics;
pub mod notification;
pub mod resilience;
pub mod tool_registry;

#[cfg(test)]
mod test_support;
