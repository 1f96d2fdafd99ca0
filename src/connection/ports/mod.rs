//! Port contracts for outbound tool calls.

mod client;

pub use client::{
    ToolClient, ToolClientError, ToolClientFactory, ToolClientResult, ToolReply, ToolRequest,
};
