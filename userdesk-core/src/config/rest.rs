use crate::constants::DEFAULT_REST_BIND;
use serde::Deserialize;

const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
];

/// REST gateway listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub bind: String,
    pub cors_origins: Vec<String>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_REST_BIND.to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawRest {
    pub(super) bind: Option<String>,
    pub(super) cors_origins: Option<Vec<String>>,
}

impl From<RawRest> for RestConfig {
    fn from(raw: RawRest) -> Self {
        let defaults = RestConfig::default();
        Self {
            bind: raw.bind.unwrap_or(defaults.bind),
            cors_origins: raw.cors_origins.unwrap_or(defaults.cors_origins),
        }
    }
}
