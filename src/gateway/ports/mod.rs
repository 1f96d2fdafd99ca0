//! Port contracts for dispatching tool calls.
//!
//! Callers such as the notification worker depend on [`ToolDispatch`]
//! rather than on the concrete dispatcher.

pub mod dispatch;

pub use dispatch::ToolDispatch;

#[cfg(test)]
pub use dispatch::MockToolDispatch;
