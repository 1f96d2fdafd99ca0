//! Domain model for gateway metrics.

mod health;
mod snapshot;

pub use health::{HealthReport, HealthStatus};
pub use snapshot::{MetricsSnapshot, ToolUsageStat};
