//! Model types - Request, Reply, and Error types

use crate::application::catalog::FunctionSchema;
use crate::domain::{FunctionCall, Turn};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// One function-calling exchange with a model.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub model: String,
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub functions: Vec<FunctionSchema>,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Single user prompt with no tools attached.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::User(prompt.into())],
            ..Self::new(model)
        }
    }
}

/// What the model answered: either final text or a request to call a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    FunctionCall(FunctionCall),
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("provider '{provider}' did not answer within {after:?}")]
    Timeout { provider: String, after: Duration },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            after,
        }
    }

    /// Short, human-facing description of the failure.
    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => {
                format!("Provider '{provider}' needs an API key. Check config/.env.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Could not connect to model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("Request to '{provider}' timed out.")
                } else if let Some(status) = source.status() {
                    match status {
                        StatusCode::NOT_FOUND => format!("Endpoint for '{provider}' was not found."),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            format!("Provider '{provider}' rejected the API key.")
                        }
                        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                            format!("Provider '{provider}' is currently unavailable.")
                        }
                        _ => format!("Request to '{provider}' failed: {}", status.as_u16()),
                    }
                } else {
                    format!("Network error talking to '{provider}'.")
                }
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Response from '{provider}' was not understood.")
            }
            ModelError::Timeout { provider, after } => {
                format!("Provider '{provider}' did not answer within {}s.", after.as_secs())
            }
        }
    }
}
