use super::agent::AgentConfig;
use super::error::ConfigError;
use super::provider::ModelProviderConfig;
use super::rest::RestConfig;
use super::roots::RootsConfig;
use super::server::ServerConfig;
use std::path::Path;

/// Application configuration loaded from client.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_provider: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub providers: Vec<ModelProviderConfig>,
    pub server: ServerConfig,
    pub agent: AgentConfig,
    pub rest: RestConfig,
    pub roots: RootsConfig,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// The provider named by `default_provider`; validation guarantees it exists.
    pub fn active_provider(&self) -> Result<&ModelProviderConfig, ConfigError> {
        self.providers
            .iter()
            .find(|p| p.id == self.default_provider)
            .ok_or_else(|| ConfigError::ProviderNotFound {
                provider: self.default_provider.clone(),
            })
    }
}
