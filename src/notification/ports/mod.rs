//! Port contracts for user notification delivery.

pub mod sink;

pub use sink::{NotificationError, NotificationResult, NotificationSink};
