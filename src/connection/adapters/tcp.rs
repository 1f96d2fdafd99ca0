//! Newline-delimited JSON transport over TCP.
//!
//! Each call writes one request object on its own line and reads one reply
//! line: `{"response": ...}` on success or `{"error": ...}` when the tool
//! rejects the request. Connections are opened lazily and kept for reuse.
//! Reply lines longer than [`MAX_REPLY_BYTES`] are rejected and the
//! connection is dropped.

use crate::{
    connection::ports::{
        ToolClient, ToolClientError, ToolClientFactory, ToolClientResult, ToolReply, ToolRequest,
    },
    tool_registry::domain::ToolEndpoint,
};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

/// Upper bound on one reply line, newline included.
pub const MAX_REPLY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireReply {
    Response { response: String },
    Error { error: String },
}

/// Factory for [`TcpToolClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpToolClientFactory;

impl TcpToolClientFactory {
    /// Creates a factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ToolClientFactory for TcpToolClientFactory {
    type Client = TcpToolClient;

    fn create(&self, endpoint: &ToolEndpoint) -> ToolClientResult<Self::Client> {
        Ok(TcpToolClient {
            target: endpoint.endpoint_key().to_string(),
            connection: None,
        })
    }
}

/// Lazily connected TCP client for one endpoint.
#[derive(Debug)]
pub struct TcpToolClient {
    target: String,
    connection: Option<BufReader<TcpStream>>,
}

impl TcpToolClient {
    async fn connect(&self) -> ToolClientResult<BufReader<TcpStream>> {
        let stream = TcpStream::connect(&self.target)
            .await
            .map_err(|err| ToolClientError::connect(self.target.as_str(), err))?;
        stream.set_nodelay(true).map_err(ToolClientError::io)?;
        debug!(endpoint = %self.target, "tool connection established");
        Ok(BufReader::new(stream))
    }
}

async fn exchange(
    connection: &mut BufReader<TcpStream>,
    request: &ToolRequest,
) -> ToolClientResult<WireReply> {
    let mut line = serde_json::to_string(request)
        .map_err(|err| ToolClientError::Protocol(err.to_string()))?;
    line.push('\n');
    connection
        .get_mut()
        .write_all(line.as_bytes())
        .await
        .map_err(ToolClientError::io)?;

    let mut reply = String::new();
    let read = connection
        .take(MAX_REPLY_BYTES)
        .read_line(&mut reply)
        .await
        .map_err(ToolClientError::io)?;
    if read == 0 {
        return Err(ToolClientError::io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed by tool",
        )));
    }
    if !reply.ends_with('\n') && u64::try_from(read).is_ok_and(|len| len >= MAX_REPLY_BYTES) {
        return Err(ToolClientError::Protocol(format!(
            "reply exceeds {MAX_REPLY_BYTES} bytes"
        )));
    }
    serde_json::from_str(reply.trim_end()).map_err(|err| ToolClientError::Protocol(err.to_string()))
}

#[async_trait]
impl ToolClient for TcpToolClient {
    async fn process_message(&mut self, request: &ToolRequest) -> ToolClientResult<ToolReply> {
        // The connection is owned by this future while a call is in flight, so
        // a call cancelled mid-exchange drops it instead of leaving a
        // half-read reply on a reused socket.
        let mut connection = match self.connection.take() {
            Some(connection) => connection,
            None => self.connect().await?,
        };
        let reply = exchange(&mut connection, request).await?;
        self.connection = Some(connection);
        match reply {
            WireReply::Response { response } => Ok(ToolReply { response }),
            WireReply::Error { error } => Err(ToolClientError::Remote(error)),
        }
    }

    fn close(&mut self) {
        self.connection = None;
    }
}
