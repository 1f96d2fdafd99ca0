//! Adapter implementations for the outbound client port.

mod memory;
mod tcp;

pub use memory::{InMemoryToolBackend, InMemoryToolClient, ToolBehaviour};
pub use tcp::{MAX_REPLY_BYTES, TcpToolClient, TcpToolClientFactory};
