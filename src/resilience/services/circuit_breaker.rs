//! Breaker registry keyed by endpoint.
//!
//! Each endpoint key owns its own mutex, so updates for one key are
//! linearizable while distinct keys never contend.

use crate::{
    resilience::domain::{BreakerConfig, BreakerState, BreakerStats},
    tool_registry::domain::EndpointKey,
};
use mockable::Clock;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{info, warn};

/// Circuit breakers for every endpoint key seen so far.
pub struct CircuitBreakerRegistry<C>
where
    C: Clock + Send + Sync,
{
    config: BreakerConfig,
    clock: Arc<C>,
    states: RwLock<HashMap<EndpointKey, Mutex<BreakerState>>>,
}

impl<C> CircuitBreakerRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: BreakerConfig, clock: Arc<C>) -> Self {
        Self {
            config,
            clock,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the shared breaker configuration.
    #[must_use]
    pub const fn config(&self) -> &BreakerConfig {
        &self.config
    }

    fn with_state<R>(&self, key: &EndpointKey, action: impl FnOnce(&mut BreakerState) -> R) -> R {
        {
            let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(state) = states.get(key) {
                return action(&mut *lock(state));
            }
        }
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let state = states.entry(key.clone()).or_default();
        action(&mut *lock(state))
    }

    /// Returns whether a call to `key` may proceed now.
    ///
    /// Unknown keys are closed. An open breaker past its cooldown is reset and
    /// admits the call.
    #[must_use]
    pub fn admit(&self, key: &EndpointKey) -> bool {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = states.get(key) else {
            return true;
        };
        let mut state = lock(entry);
        let was_open = state.is_open();
        let admitted = state.admit(self.clock.utc(), &self.config);
        if was_open && admitted {
            info!(endpoint = %key, "circuit breaker cooldown elapsed, closing");
        }
        admitted
    }

    /// Records a successful call to `key`.
    pub fn record_success(&self, key: &EndpointKey) {
        self.with_state(key, BreakerState::record_success);
    }

    /// Records a failed call to `key`, opening its breaker at the threshold.
    pub fn record_failure(&self, key: &EndpointKey) {
        let (opened, failures) = self.with_state(key, |state| {
            let opened = state.record_failure(self.clock.utc(), &self.config);
            (opened, state.consecutive_failures())
        });
        if opened {
            warn!(endpoint = %key, failures, "circuit breaker opened");
        }
    }

    /// Closes the breaker for `key` and clears its failure history.
    pub fn reset(&self, key: &EndpointKey) {
        self.with_state(key, |state| *state = BreakerState::default());
        info!(endpoint = %key, "circuit breaker reset");
    }

    /// Returns the current state for `key`, if it has been seen.
    #[must_use]
    pub fn state(&self, key: &EndpointKey) -> Option<BreakerState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|state| *lock(state))
    }

    /// Returns a summary for every endpoint key seen so far.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<EndpointKey, BreakerStats> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, state)| (key.clone(), lock(state).stats()))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
