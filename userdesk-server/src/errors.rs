use crate::protocol::{ACCESS_DENIED, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, RESOURCE_NOT_FOUND};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} does not contain a JSON array of users: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode users: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failure while processing a well-formed request; answered as a JSON-RPC error.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),
    #[error("{0}")]
    ResourceNotFound(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RequestError {
    pub fn code(&self) -> i64 {
        match self {
            RequestError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RequestError::InvalidParams(_)
            | RequestError::UnknownTool(_)
            | RequestError::UnknownPrompt(_) => INVALID_PARAMS,
            RequestError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            RequestError::AccessDenied(_) => ACCESS_DENIED,
            RequestError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl From<StoreError> for RequestError {
    fn from(err: StoreError) -> Self {
        RequestError::Internal(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to frame message: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}
