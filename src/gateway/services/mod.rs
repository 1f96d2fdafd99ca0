//! Orchestration services for the gateway.

mod dispatcher;

pub use dispatcher::GatewayDispatcher;
