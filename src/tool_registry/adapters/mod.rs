//! Adapter implementations for the configuration source port.

mod env;
mod memory_source;
mod toml_file;

pub use env::{
    EnvOverridingSource, GATEWAY_POOL_SIZE_VAR, GATEWAY_RETRIES_VAR, GATEWAY_TIMEOUT_VAR,
};
pub use memory_source::StaticToolConfigSource;
pub use toml_file::TomlFileConfigSource;
