// Config loading tests - AppConfig::load from client.toml files on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;
use userdesk_core::config::{AppConfig, ConfigError};

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("client.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

const FULL: &str = r#"
model = "gemini-2.0-flash"
default_provider = "gemini"
system_prompt = "You manage user records."

[[providers]]
id = "gemini"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"

[[providers]]
id = "local"
type = "openai"
endpoint = "http://127.0.0.1:11434"

[server]
name = "users"
command = "target/debug/userdesk-server"
args = ["--data-dir", "data"]

[agent]
max_iterations = 3
model_timeout_secs = 60
tool_timeout_secs = 15

[rest]
bind = "127.0.0.1:9000"
cors_origins = ["http://localhost:5173"]

[roots]
data_dir = "/srv/userdesk/data"
"#;

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/client.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn loads_every_section() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), FULL);

    let config = AppConfig::load(Some(&path)).expect("valid config");

    assert_eq!(config.model, "gemini-2.0-flash");
    assert_eq!(config.system_prompt.as_deref(), Some("You manage user records."));
    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.active_provider().expect("active").id, "gemini");
    assert_eq!(config.server.name, "users");
    assert_eq!(config.server.args, vec!["--data-dir", "data"]);
    assert_eq!(config.agent.max_iterations, 3);
    assert_eq!(config.agent.model_timeout, Some(Duration::from_secs(60)));
    assert_eq!(config.agent.tool_timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.rest.bind, "127.0.0.1:9000");
    assert_eq!(config.rest.cors_origins, vec!["http://localhost:5173"]);
    assert_eq!(config.roots.roots()[0].uri, "file:///srv/userdesk/data");
}

#[test]
fn optional_sections_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
model = "gpt-4o-mini"
default_provider = "openai"

[[providers]]
id = "openai"
type = "openai"
endpoint = "https://api.openai.com"

[server]
command = "userdesk-server"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("valid config");

    assert_eq!(config.agent.max_iterations, 5);
    assert_eq!(config.agent.model_timeout, None);
    assert_eq!(config.rest.bind, "0.0.0.0:8000");
    assert!(config.rest.cors_origins.contains(&"http://localhost:3000".to_string()));
    assert_eq!(config.roots.name, "User Data Directory");
}

#[test]
fn returns_error_when_model_missing() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), &FULL.replace("model = \"gemini-2.0-flash\"", ""));

    assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::MissingModel)));
}

#[test]
fn returns_error_when_default_provider_is_not_configured() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        &FULL.replace("default_provider = \"gemini\"", "default_provider = \"anthropic\""),
    );

    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::ProviderNotFound { provider }) if provider == "anthropic"
    ));
}

#[test]
fn returns_error_when_server_command_missing() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        &FULL.replace("command = \"target/debug/userdesk-server\"", "command = \"  \""),
    );

    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::MissingServerCommand)
    ));
}

#[test]
fn returns_error_when_toml_is_malformed() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "model = [unterminated");

    assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Parse { .. })));
}
