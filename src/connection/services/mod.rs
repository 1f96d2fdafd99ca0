//! Application services for pooled outbound connections.

mod pool;

pub use pool::{ClientLease, ConnectionPool};
