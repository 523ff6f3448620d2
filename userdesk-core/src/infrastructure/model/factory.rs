//! Provider factory - creates clients from config

use super::clients::{GeminiClient, OpenAiClient};
use super::traits::ModelProvider;
use crate::config::ModelProviderConfig;
use std::env;
use std::sync::Arc;
use tracing::warn;

/// Resolve API key from environment variable
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from provider config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// - `gemini`, `google` → Gemini `generateContent`
    /// - Others → OpenAI-compatible chat completions
    pub fn create(config: &ModelProviderConfig) -> Arc<dyn ModelProvider> {
        if config.is_gemini() {
            Arc::new(GeminiClient::from_config(config))
        } else {
            Arc::new(OpenAiClient::from_config(config))
        }
    }
}
