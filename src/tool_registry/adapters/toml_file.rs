//! TOML file configuration source.

use crate::tool_registry::{
    domain::GatewayConfig,
    ports::{ToolConfigSource, ToolConfigSourceError, ToolConfigSourceResult},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// Reads the gateway configuration from a TOML file on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlFileConfigSource {
    path: Utf8PathBuf,
}

impl TomlFileConfigSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_contents(&self) -> std::io::Result<String> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| std::io::Error::other("configuration path must include a file name"))?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        dir.read_to_string(file_name)
    }
}

impl ToolConfigSource for TomlFileConfigSource {
    fn load(&self) -> ToolConfigSourceResult<GatewayConfig> {
        let contents = self
            .read_contents()
            .map_err(|err| ToolConfigSourceError::read(self.path.as_str(), err))?;
        toml::from_str(&contents)
            .map_err(|err| ToolConfigSourceError::decode(self.path.as_str(), err))
    }
}
