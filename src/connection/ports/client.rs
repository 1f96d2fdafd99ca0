//! Outbound client port for one remote tool endpoint.

use crate::tool_registry::domain::ToolEndpoint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for outbound tool client operations.
pub type ToolClientResult<T> = Result<T, ToolClientError>;

/// Unary request sent to a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// User message forwarded to the tool.
    pub message: String,
    /// Identifier of the user the message belongs to.
    pub user_id: String,
}

impl ToolRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(message: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
        }
    }
}

/// Unary reply returned by a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    /// Tool output.
    pub response: String,
}

/// Handle to an open channel to one endpoint.
///
/// A client is held by at most one in-flight call; methods take `&mut self`.
/// A call future may be dropped before completion when its deadline fires,
/// and the client must remain usable (or reconnect) afterwards.
#[async_trait]
pub trait ToolClient: Send {
    /// Sends one request and waits for the reply.
    async fn process_message(&mut self, request: &ToolRequest) -> ToolClientResult<ToolReply>;

    /// Releases the underlying channel. The client is not used afterwards.
    fn close(&mut self);
}

/// Creates clients for endpoints.
///
/// Creation is synchronous and must not block on the network: channels are
/// expected to connect lazily on first use.
pub trait ToolClientFactory: Send + Sync {
    /// Client type produced by this factory.
    type Client: ToolClient;

    /// Creates a new client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolClientError`] when the endpoint cannot be addressed.
    fn create(&self, endpoint: &ToolEndpoint) -> ToolClientResult<Self::Client>;
}

/// Errors returned by tool client adapters.
#[derive(Debug, Clone, Error)]
pub enum ToolClientError {
    /// Establishing the channel failed.
    #[error("connection to {endpoint} failed: {source}")]
    Connect {
        /// Endpoint key.
        endpoint: String,
        /// Underlying failure.
        source: Arc<std::io::Error>,
    },

    /// Channel I/O failed mid-call.
    #[error("transport error: {0}")]
    Io(Arc<std::io::Error>),

    /// The peer sent something that is not a valid reply.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The tool answered with an error status.
    #[error("{0}")]
    Remote(String),
}

impl ToolClientError {
    /// Wraps a connection failure.
    #[must_use]
    pub fn connect(endpoint: impl Into<String>, err: std::io::Error) -> Self {
        Self::Connect {
            endpoint: endpoint.into(),
            source: Arc::new(err),
        }
    }

    /// Wraps a channel I/O failure.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
