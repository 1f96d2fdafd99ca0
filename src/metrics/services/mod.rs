//! Metrics services.

mod aggregator;

pub use aggregator::{DEFAULT_RESPONSE_WINDOW, MetricsAggregator};
