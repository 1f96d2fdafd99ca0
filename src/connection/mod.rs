//! Outbound connections to remote tools.
//!
//! The [`ports::ToolClient`] contract treats a tool as an opaque unary call.
//! [`services::ConnectionPool`] caches clients per endpoint key so that
//! dispatches reuse open channels instead of reconnecting on every attempt.

pub mod adapters;
pub mod ports;
pub mod services;
