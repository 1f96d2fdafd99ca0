//! Port contracts for loading tool configuration.

mod source;

pub use source::{ToolConfigSource, ToolConfigSourceError, ToolConfigSourceResult};
