//! Dispatch worker that forwards tool replies to per-user notification
//! channels.
//!
//! Jobs arrive on a channel, are dispatched through the
//! [`crate::gateway::ports::ToolDispatch`] port, and every stage is reported
//! to the requesting user through a [`ports::NotificationSink`]. Delivery
//! problems never affect dispatch.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
