//! In-memory tool backend for dispatch tests.

use crate::{
    connection::ports::{
        ToolClient, ToolClientError, ToolClientFactory, ToolClientResult, ToolReply, ToolRequest,
    },
    tool_registry::domain::{EndpointKey, ToolEndpoint},
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How a simulated endpoint answers one call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolBehaviour {
    /// Replies with the request message.
    #[default]
    Echo,
    /// Replies with a fixed response.
    Respond(String),
    /// Fails with a remote error carrying the message.
    Fail(String),
    /// Waits for the duration, then echoes.
    Stall(Duration),
}

#[derive(Debug, Default)]
struct EndpointState {
    behaviour: ToolBehaviour,
    script: VecDeque<ToolBehaviour>,
    calls: usize,
    created: usize,
    closed: usize,
}

type SharedState = Arc<Mutex<HashMap<EndpointKey, EndpointState>>>;

/// Client factory simulating remote tools without any network I/O.
///
/// Each endpoint key answers with a default behaviour, optionally preceded by
/// a script of one-shot behaviours consumed in order. Call, creation and
/// close counts are recorded per key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryToolBackend {
    state: SharedState,
}

impl InMemoryToolBackend {
    /// Creates a backend where every endpoint echoes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HashMap<EndpointKey, EndpointState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the default behaviour for `key`.
    pub fn set_behaviour(&self, key: &EndpointKey, behaviour: ToolBehaviour) {
        self.state().entry(key.clone()).or_default().behaviour = behaviour;
    }

    /// Queues one-shot behaviours consumed before the default applies.
    pub fn script(&self, key: &EndpointKey, behaviours: impl IntoIterator<Item = ToolBehaviour>) {
        self.state()
            .entry(key.clone())
            .or_default()
            .script
            .extend(behaviours);
    }

    /// Returns how many calls reached `key`.
    #[must_use]
    pub fn calls(&self, key: &EndpointKey) -> usize {
        self.state().get(key).map_or(0, |state| state.calls)
    }

    /// Returns how many clients were created for `key`.
    #[must_use]
    pub fn clients_created(&self, key: &EndpointKey) -> usize {
        self.state().get(key).map_or(0, |state| state.created)
    }

    /// Returns how many clients for `key` were closed.
    #[must_use]
    pub fn clients_closed(&self, key: &EndpointKey) -> usize {
        self.state().get(key).map_or(0, |state| state.closed)
    }
}

impl ToolClientFactory for InMemoryToolBackend {
    type Client = InMemoryToolClient;

    fn create(&self, endpoint: &ToolEndpoint) -> ToolClientResult<Self::Client> {
        let key = endpoint.endpoint_key();
        self.state().entry(key.clone()).or_default().created += 1;
        Ok(InMemoryToolClient {
            key,
            state: Arc::clone(&self.state),
        })
    }
}

/// Client produced by [`InMemoryToolBackend`].
#[derive(Debug)]
pub struct InMemoryToolClient {
    key: EndpointKey,
    state: SharedState,
}

impl InMemoryToolClient {
    fn next_behaviour(&self) -> ToolBehaviour {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let endpoint = state.entry(self.key.clone()).or_default();
        endpoint.calls += 1;
        endpoint
            .script
            .pop_front()
            .unwrap_or_else(|| endpoint.behaviour.clone())
    }
}

#[async_trait]
impl ToolClient for InMemoryToolClient {
    async fn process_message(&mut self, request: &ToolRequest) -> ToolClientResult<ToolReply> {
        match self.next_behaviour() {
            ToolBehaviour::Echo => Ok(ToolReply {
                response: request.message.clone(),
            }),
            ToolBehaviour::Respond(response) => Ok(ToolReply { response }),
            ToolBehaviour::Fail(message) => Err(ToolClientError::Remote(message)),
            ToolBehaviour::Stall(duration) => {
                tokio::time::sleep(duration).await;
                Ok(ToolReply {
                    response: request.message.clone(),
                })
            }
        }
    }

    fn close(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entry(self.key.clone()).or_default().closed += 1;
    }
}
