//! # Provider Configuration
//!
//! | Type | Description | API Key Required |
//! |------|-------------|-----------------|
//! | `gemini` / `google` | Google Gemini API | Yes |
//! | anything else | OpenAI-compatible chat completions | Optional |

use serde::{Deserialize, Serialize};

/// Configuration for a language model provider.
///
/// ```toml
/// [[providers]]
/// id = "gemini"
/// type = "gemini"
/// endpoint = "https://generativelanguage.googleapis.com"
/// api_key = "GEMINI_API_KEY"
/// ```
///
/// `api_key` names the environment variable holding the key, never the key itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProviderConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API path override (e.g., "v1beta/models" for Gemini)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
}

impl From<RawProviderConfig> for ModelProviderConfig {
    fn from(raw: RawProviderConfig) -> Self {
        Self {
            id: raw.id,
            provider_type: raw.provider_type,
            endpoint: raw.endpoint.unwrap_or_default(),
            api_key: raw.api_key,
            api_path: raw.api_path,
        }
    }
}

impl ModelProviderConfig {
    /// Check if this is a Gemini provider (case-insensitive).
    pub fn is_gemini(&self) -> bool {
        matches!(
            self.provider_type.to_lowercase().as_str(),
            "gemini" | "google" | "google-ai"
        )
    }
}
