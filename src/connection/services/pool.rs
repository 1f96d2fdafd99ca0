//! Per-endpoint pool of reusable tool clients.
//!
//! Acquire never waits: an empty free list means a new client is created.
//! The bound is enforced on release instead, where a client returned to a
//! full free list is closed. Under load the number of live clients for one
//! endpoint can therefore exceed the capacity until the surplus is returned.

use crate::{
    connection::ports::{
        ToolClient, ToolClientError, ToolClientFactory, ToolClientResult, ToolReply, ToolRequest,
    },
    tool_registry::domain::{EndpointKey, ToolEndpoint},
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info, warn};

type FreeLists<C> = HashMap<EndpointKey, Mutex<Vec<C>>>;

/// Bounded pool of idle clients keyed by endpoint.
pub struct ConnectionPool<F>
where
    F: ToolClientFactory,
{
    factory: Arc<F>,
    capacity: usize,
    free_lists: RwLock<FreeLists<F::Client>>,
}

impl<F> ConnectionPool<F>
where
    F: ToolClientFactory,
{
    /// Creates an empty pool keeping at most `capacity` idle clients per
    /// endpoint key.
    #[must_use]
    pub fn new(factory: Arc<F>, capacity: usize) -> Self {
        Self {
            factory,
            capacity,
            free_lists: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the idle capacity per endpoint key.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Runs `action` against the free list for `key` while the map is held
    /// shared, creating the list first when the key is new.
    fn with_free_list<R>(
        &self,
        key: &EndpointKey,
        action: impl FnOnce(&mut Vec<F::Client>) -> R,
    ) -> R {
        {
            let lists = self.free_lists.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(list) = lists.get(key) {
                return action(&mut *lock(list));
            }
        }
        let mut lists = self.free_lists.write().unwrap_or_else(PoisonError::into_inner);
        let list = lists.entry(key.clone()).or_default();
        action(&mut *lock(list))
    }

    /// Takes an idle client for `endpoint`, or creates one when none is idle.
    ///
    /// The returned lease gives the client back to the pool when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ToolClientError`] when a new client cannot be created.
    pub fn acquire(&self, endpoint: &ToolEndpoint) -> ToolClientResult<ClientLease<'_, F>> {
        let key = endpoint.endpoint_key();
        let client = match self.with_free_list(&key, Vec::pop) {
            Some(client) => {
                debug!(endpoint = %key, "reusing pooled client");
                client
            }
            None => {
                debug!(endpoint = %key, "creating client");
                self.factory.create(endpoint)?
            }
        };
        Ok(ClientLease {
            pool: self,
            key,
            client: Some(client),
        })
    }

    /// Returns a client to the free list, closing it when the list is full.
    pub fn release(&self, key: &EndpointKey, client: F::Client) {
        let surplus = self.with_free_list(key, |list| {
            if list.len() < self.capacity {
                list.push(client);
                None
            } else {
                Some(client)
            }
        });
        if let Some(mut extra) = surplus {
            warn!(endpoint = %key, capacity = self.capacity, "pool full, closing surplus client");
            extra.close();
        }
    }

    /// Closes every idle client and forgets every endpoint key.
    ///
    /// Clients leased at the time of the call are returned to fresh free
    /// lists on release.
    pub fn close_all(&self) {
        let drained: Vec<_> = self
            .free_lists
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        let mut closed = 0_usize;
        for (_, list) in drained {
            for mut client in list.into_inner().unwrap_or_else(PoisonError::into_inner) {
                client.close();
                closed += 1;
            }
        }
        info!(closed, "closed all pooled clients");
    }

    /// Returns the number of idle clients per endpoint key.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<EndpointKey, usize> {
        self.free_lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, list)| (key.clone(), lock(list).len()))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive use of one pooled client.
///
/// Dropping the lease releases the client exactly once, whichever way the
/// call ended: success, error, or cancellation by a deadline.
pub struct ClientLease<'pool, F>
where
    F: ToolClientFactory,
{
    pool: &'pool ConnectionPool<F>,
    key: EndpointKey,
    client: Option<F::Client>,
}

impl<F> ClientLease<'_, F>
where
    F: ToolClientFactory,
{
    /// Returns the endpoint key the client belongs to.
    #[must_use]
    pub const fn endpoint_key(&self) -> &EndpointKey {
        &self.key
    }

    /// Sends one request over the leased client.
    ///
    /// # Errors
    ///
    /// Returns the client's [`ToolClientError`].
    pub async fn process_message(
        &mut self,
        request: &ToolRequest,
    ) -> ToolClientResult<ToolReply> {
        match self.client.as_mut() {
            Some(client) => client.process_message(request).await,
            None => Err(ToolClientError::Protocol(
                "client lease already released".to_owned(),
            )),
        }
    }
}

impl<F> Drop for ClientLease<'_, F>
where
    F: ToolClientFactory,
{
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.release(&self.key, client);
        }
    }
}
