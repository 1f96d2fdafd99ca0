//! Gateway dispatcher: the single entry point for calling remote tools.
//!
//! The dispatcher validates the tool against the registry, runs the call
//! through the retry executor and circuit breaker over a pooled client, and
//! reports every outcome as a [`domain::GatewayResponse`]. It never returns
//! an error to its caller. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
