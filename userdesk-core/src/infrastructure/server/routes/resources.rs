use super::super::dto::{ErrorResponse, ResourceReadRequest, ResourceReadResponse};
use super::super::error::{ApiError, ApiResult, api_error, backend_unavailable, not_connected};
use super::super::state::ServerState;
use crate::application::session::SessionError;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

#[utoipa::path(
    post,
    path = "/resources/read",
    tag = "backend",
    request_body = ResourceReadRequest,
    responses(
        (status = 200, description = "Resource contents, parsed as JSON when possible", body = ResourceReadResponse),
        (status = 403, description = "URI outside the backend sandbox", body = ErrorResponse),
        (status = 404, description = "Unknown resource", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse),
        (status = 503, description = "Backend session not established or lost", body = ErrorResponse)
    )
)]
pub async fn read_resource_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<ResourceReadRequest>,
) -> ApiResult<ResourceReadResponse> {
    let context = state.context().ok_or_else(not_connected)?;

    debug!(uri = %payload.uri, "Received /resources/read request");
    let result = context
        .session()
        .read_resource(&payload.uri)
        .await
        .map_err(|err| resource_error(&payload.uri, err))?;

    Ok(Json(ResourceReadResponse::from_text(result.first_text())))
}

fn resource_error(uri: &str, err: SessionError) -> ApiError {
    warn!(%uri, %err, "Resource read failed");
    match err {
        SessionError::AccessDenied(_) => {
            api_error(StatusCode::FORBIDDEN, format!("Access denied: {uri}"))
        }
        SessionError::UnknownResource(_) => {
            api_error(StatusCode::NOT_FOUND, format!("Resource not found: {uri}"))
        }
        other if other.is_fatal() => backend_unavailable(&other),
        other => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error reading resource: {other}"),
        ),
    }
}
