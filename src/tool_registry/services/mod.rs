//! Application services for tool registry operations.

mod registry;

pub use registry::{ToolRegistry, ToolRegistryError, ToolRegistryResult};
