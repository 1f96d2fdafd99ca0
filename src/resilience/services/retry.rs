//! Bounded retry with exponential backoff behind a circuit breaker.

use crate::{
    resilience::{
        domain::{AttemptError, ResilienceError, RetryOverrides, RetryPolicy},
        services::CircuitBreakerRegistry,
    },
    tool_registry::domain::{ResilienceSettings, ToolEndpoint},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs a remote operation with retries, feeding every outcome into the
/// endpoint's circuit breaker.
pub struct RetryExecutor<C>
where
    C: Clock + Send + Sync,
{
    breakers: Arc<CircuitBreakerRegistry<C>>,
    settings: ResilienceSettings,
}

impl<C> RetryExecutor<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an executor sharing `breakers`.
    #[must_use]
    pub const fn new(breakers: Arc<CircuitBreakerRegistry<C>>, settings: ResilienceSettings) -> Self {
        Self { breakers, settings }
    }

    /// Returns the breaker registry this executor reports to.
    #[must_use]
    pub const fn breakers(&self) -> &Arc<CircuitBreakerRegistry<C>> {
        &self.breakers
    }

    /// Returns the policy applied to calls against `endpoint`.
    #[must_use]
    pub fn policy_for(
        &self,
        endpoint: &ToolEndpoint,
        overrides: Option<&RetryOverrides>,
    ) -> RetryPolicy {
        let policy = RetryPolicy::from_settings(&self.settings, endpoint.max_retries());
        overrides.map_or(policy, |overrides| policy.with_overrides(overrides))
    }

    /// Executes `operation` against `endpoint`.
    ///
    /// The breaker is consulted once, before the first attempt. Each failed
    /// attempt is recorded against the endpoint key, so the breaker can open
    /// while later attempts of the same call are still pending. `operation`
    /// receives the zero-based attempt index.
    ///
    /// # Errors
    ///
    /// Returns [`ResilienceError::CircuitOpen`] without calling `operation`
    /// when the breaker rejects the call, and
    /// [`ResilienceError::RetriesExhausted`] with the final attempt's error
    /// once the budget is spent.
    pub async fn execute<T, Op, Fut>(
        &self,
        endpoint: &ToolEndpoint,
        overrides: Option<&RetryOverrides>,
        mut operation: Op,
    ) -> Result<T, ResilienceError>
    where
        Op: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let policy = self.policy_for(endpoint, overrides);
        let key = endpoint.endpoint_key();

        if !self.breakers.admit(&key) {
            return Err(ResilienceError::CircuitOpen {
                tool_id: endpoint.id().clone(),
                endpoint: key,
            });
        }

        let mut attempt = 0_u32;
        loop {
            debug!(tool_id = %endpoint.id(), endpoint = %key, attempt, "dispatch attempt");
            match operation(attempt).await {
                Ok(value) => {
                    self.breakers.record_success(&key);
                    return Ok(value);
                }
                Err(err) => {
                    self.breakers.record_failure(&key);
                    warn!(
                        tool_id = %endpoint.id(),
                        endpoint = %key,
                        attempt,
                        error = %err,
                        "dispatch attempt failed"
                    );
                    let attempts = attempt.saturating_add(1);
                    if attempts >= policy.max_attempts() {
                        return Err(ResilienceError::RetriesExhausted {
                            attempts,
                            last_error: err,
                        });
                    }
                    tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}
