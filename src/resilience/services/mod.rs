//! Application services for breaker bookkeeping and retried execution.

mod circuit_breaker;
mod retry;

pub use circuit_breaker::CircuitBreakerRegistry;
pub use retry::RetryExecutor;
