use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why `client.toml` could not be turned into an [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no client configuration at {path:?}")]
    NotFound { path: PathBuf },

    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("'model' must name the model used for chat and sampling")]
    MissingModel,

    #[error("'default_provider' must name one of the [[providers]] entries")]
    MissingDefaultProvider,

    #[error("at least one [[providers]] entry is required")]
    NoProvidersConfigured,

    #[error("default provider '{provider}' has no [[providers]] entry")]
    ProviderNotFound { provider: String },

    #[error("provider '{provider}' has an empty endpoint")]
    MissingEndpoint { provider: String },

    #[error("[server] needs a non-empty 'command' to spawn the backend")]
    MissingServerCommand,

    #[error("[agent] max_iterations must be at least 1")]
    InvalidIterationCeiling,
}
