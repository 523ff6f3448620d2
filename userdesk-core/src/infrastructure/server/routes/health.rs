use super::super::dto::HealthResponse;
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Gateway is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "userdesk REST gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mcp_connected: state.context().is_some(),
    })
}
