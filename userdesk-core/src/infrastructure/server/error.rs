use super::dto::ErrorResponse;
use crate::application::session::SessionError;
use crate::config::ConfigError;
use axum::Json;
use axum::http::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to establish backend session: {0}")]
    Session(#[from] SessionError),
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Error half of every handler result: status plus `{"detail": ...}`.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

pub fn not_connected() -> ApiError {
    api_error(StatusCode::SERVICE_UNAVAILABLE, "MCP client not initialized")
}

/// A session that died after startup reads the same as one never established.
pub fn backend_unavailable(err: &SessionError) -> ApiError {
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("MCP backend unavailable: {err}"),
    )
}
