//! Request metrics and the derived health verdict.
//!
//! [`services::MetricsAggregator`] counts every dispatched request and its
//! outcome for the process lifetime, keeps a bounded window of recent
//! response times, and derives a three-level [`domain::HealthStatus`].

pub mod domain;
pub mod services;
