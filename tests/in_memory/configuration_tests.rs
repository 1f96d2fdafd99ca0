//! Gateways built from TOML files and environment overrides.

use super::helpers::ManualClock;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use std::sync::Arc;
use switchyard::{
    connection::adapters::InMemoryToolBackend,
    gateway::services::GatewayDispatcher,
    tool_registry::{
        adapters::{EnvOverridingSource, GATEWAY_RETRIES_VAR, TomlFileConfigSource},
        ports::ToolConfigSourceError,
        services::ToolRegistryError,
    },
};

const INITIAL: &str = r#"
default_timeout_ms = 2000
connection_pool_size = 2

[[tools]]
id = "tool1"
name = "AI Tool 1"
address = "localhost"
port = 50051

[[tools]]
id = "tool2"
address = "localhost"
port = 50052
enabled = false
"#;

struct ScratchDir(Utf8PathBuf);

impl ScratchDir {
    fn file(&self, name: &str) -> Utf8PathBuf {
        self.0.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

#[fixture]
fn scratch() -> ScratchDir {
    let dir = std::env::temp_dir().join(format!("switchyard-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("scratch dir should be created");
    ScratchDir(Utf8PathBuf::from_path_buf(dir).expect("temp dir should be UTF-8"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn file_backed_gateway_reloads_edited_tools(scratch: ScratchDir) -> Result<(), eyre::Report> {
    let path = scratch.file("gateway.toml");
    std::fs::write(&path, INITIAL)?;
    let dispatcher = GatewayDispatcher::new(
        TomlFileConfigSource::new(path.clone()),
        Arc::new(InMemoryToolBackend::new()),
        Arc::new(ManualClock::new()),
    )?;

    let disabled = dispatcher.call_tool("tool2", "hello", "u1").await;
    eyre::ensure!(
        disabled.error.as_deref() == Some("Tool is disabled"),
        "tool2 should start disabled"
    );

    std::fs::write(&path, INITIAL.replace("enabled = false", "enabled = true"))?;
    dispatcher.reload_config()?;

    let enabled = dispatcher.call_tool("tool2", "hello", "u1").await;
    eyre::ensure!(enabled.success, "tool2 should be enabled after reload");
    let names: Vec<_> = dispatcher
        .enabled_tools()
        .iter()
        .map(|endpoint| endpoint.name().to_owned())
        .collect();
    eyre::ensure!(names == ["AI Tool 1", "tool2"], "unexpected tools: {names:?}");
    Ok(())
}

#[rstest]
fn failed_reload_keeps_current_tools(scratch: ScratchDir) -> Result<(), eyre::Report> {
    let path = scratch.file("gateway.toml");
    std::fs::write(&path, INITIAL)?;
    let dispatcher = GatewayDispatcher::new(
        TomlFileConfigSource::new(path.clone()),
        Arc::new(InMemoryToolBackend::new()),
        Arc::new(ManualClock::new()),
    )?;

    std::fs::write(&path, "[[tools]]\nid = \"\"\naddress = \"x\"\nport = 1\n")?;
    let result = dispatcher.reload_config();

    eyre::ensure!(
        matches!(result, Err(ToolRegistryError::Domain(_))),
        "reload should reject the blank id"
    );
    eyre::ensure!(dispatcher.enabled_tools().len() == 1, "tools should be kept");
    Ok(())
}

#[rstest]
fn environment_overrides_apply_to_tool_defaults(scratch: ScratchDir) -> Result<(), eyre::Report> {
    let path = scratch.file("gateway.toml");
    std::fs::write(&path, INITIAL)?;
    let source = EnvOverridingSource::with_lookup(TomlFileConfigSource::new(path), |name| {
        (name == GATEWAY_RETRIES_VAR).then(|| "0".to_owned())
    });

    let dispatcher = GatewayDispatcher::new(
        source,
        Arc::new(InMemoryToolBackend::new()),
        Arc::new(ManualClock::new()),
    )?;

    let tool = dispatcher
        .enabled_tools()
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("expected one enabled tool"))?;
    eyre::ensure!(tool.max_retries() == 0, "retries override should apply");
    eyre::ensure!(tool.timeout_ms() == 2_000, "file default should apply");
    Ok(())
}

#[rstest]
fn unreadable_configuration_is_fatal(scratch: ScratchDir) {
    let result = GatewayDispatcher::new(
        TomlFileConfigSource::new(scratch.file("absent.toml")),
        Arc::new(InMemoryToolBackend::new()),
        Arc::new(ManualClock::new()),
    );

    assert!(matches!(
        result,
        Err(ToolRegistryError::Source(ToolConfigSourceError::Read { .. }))
    ));
}
