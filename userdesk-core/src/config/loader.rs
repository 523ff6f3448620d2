use super::CONFIG_PATH;
use super::agent::{AgentConfig, RawAgent};
use super::error::ConfigError;
use super::provider::{ModelProviderConfig, RawProviderConfig};
use super::rest::{RawRest, RestConfig};
use super::roots::{RawRoots, RootsConfig};
use super::server::RawServer;
use crate::constants::ENV_PATH;
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub default_provider: Option<String>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
    pub server: Option<RawServer>,
    #[serde(default)]
    pub agent: RawAgent,
    #[serde(default)]
    pub rest: RawRest,
    #[serde(default)]
    pub roots: RawRoots,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<super::AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    read_config(config_path)
}

fn read_config(path: &Path) -> Result<super::AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<super::AppConfig, ConfigError> {
    let model = parsed.model.ok_or(ConfigError::MissingModel)?;
    let default_provider = parsed
        .default_provider
        .ok_or(ConfigError::MissingDefaultProvider)?;

    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let mut providers: Vec<ModelProviderConfig> = Vec::new();
    for raw_provider in parsed.providers {
        if raw_provider
            .endpoint
            .as_deref()
            .is_none_or(|e| e.trim().is_empty())
        {
            return Err(ConfigError::MissingEndpoint {
                provider: raw_provider.id.clone(),
            });
        }
        providers.push(ModelProviderConfig::from(raw_provider));
    }
    if !providers.iter().any(|p| p.id == default_provider) {
        return Err(ConfigError::ProviderNotFound {
            provider: default_provider,
        });
    }

    let server = parsed
        .server
        .and_then(RawServer::into_config)
        .ok_or(ConfigError::MissingServerCommand)?;

    let agent = AgentConfig::from(parsed.agent);
    if agent.max_iterations == 0 {
        return Err(ConfigError::InvalidIterationCeiling);
    }

    Ok(super::AppConfig {
        default_provider,
        model,
        system_prompt: parsed.system_prompt,
        providers,
        server,
        agent,
        rest: RestConfig::from(parsed.rest),
        roots: RootsConfig::from(parsed.roots),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
model = "gemini-2.0-flash"
default_provider = "gemini"

[[providers]]
id = "gemini"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"

[server]
command = "userdesk-server"
args = ["--data-dir", "data"]
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let file = write_config(MINIMAL);
        let config = load_config(Some(file.path())).expect("valid config");

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.server.name, "userdesk");
        assert_eq!(config.server.args, vec!["--data-dir", "data"]);
        assert_eq!(config.agent.max_iterations, 5);
        assert_eq!(config.agent.tool_timeout, None);
        assert_eq!(config.agent.request_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.rest.bind, "0.0.0.0:8000");
        assert_eq!(config.rest.cors_origins.len(), 4);
        assert_eq!(config.roots.name, "User Data Directory");
        assert_eq!(config.active_provider().expect("provider").id, "gemini");
    }

    #[test]
    fn agent_section_overrides_ceiling_and_timeouts() {
        let file = write_config(&format!(
            "{MINIMAL}\n[agent]\nmax_iterations = 3\nmodel_timeout_secs = 30\ntool_timeout_secs = 10\n"
        ));
        let config = load_config(Some(file.path())).expect("valid config");

        assert_eq!(config.agent.max_iterations, 3);
        assert_eq!(config.agent.model_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.agent.tool_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn request_timeout_is_configurable_and_zero_disables_it() {
        let file = write_config(&format!("{MINIMAL}\n[agent]\nrequest_timeout_secs = 15\n"));
        let config = load_config(Some(file.path())).expect("valid config");
        assert_eq!(config.agent.request_timeout, Some(Duration::from_secs(15)));

        let file = write_config(&format!("{MINIMAL}\n[agent]\nrequest_timeout_secs = 0\n"));
        let config = load_config(Some(file.path())).expect("valid config");
        assert_eq!(config.agent.request_timeout, None);
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        let file = write_config(&format!("{MINIMAL}\n[agent]\nmax_iterations = 0\n"));
        let err = load_config(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidIterationCeiling));
    }

    #[test]
    fn missing_server_section_is_rejected() {
        let file = write_config(
            r#"
model = "m"
default_provider = "p"

[[providers]]
id = "p"
type = "openai"
endpoint = "http://localhost:1234"
"#,
        );
        let err = load_config(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::MissingServerCommand));
    }

    #[test]
    fn unknown_default_provider_is_rejected() {
        let file = write_config(&MINIMAL.replace("default_provider = \"gemini\"", "default_provider = \"other\""));
        let err = load_config(Some(file.path())).expect_err("must fail");
        assert!(matches!(err, ConfigError::ProviderNotFound { provider } if provider == "other"));
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_config(Some(&dir.path().join("absent.toml"))).expect_err("must fail");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
