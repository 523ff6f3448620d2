use super::super::dto::{
    CapabilitiesResponse, ErrorResponse, PromptSummary, ResourceSummary, RootSummary, ToolSummary,
};
use super::super::error::{ApiResult, not_connected};
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/capabilities",
    tag = "backend",
    responses(
        (status = 200, description = "Tools, resources, prompts and roots", body = CapabilitiesResponse),
        (status = 503, description = "Backend session not established", body = ErrorResponse)
    )
)]
pub async fn capabilities_handler(
    State(state): State<Arc<ServerState>>,
) -> ApiResult<CapabilitiesResponse> {
    let context = state.context().ok_or_else(not_connected)?;
    debug!(
        tools = context.tools().len(),
        resources = context.resources().len(),
        prompts = context.prompts().len(),
        "Serving /capabilities request"
    );
    Ok(Json(CapabilitiesResponse {
        tools: context.tools().iter().map(ToolSummary::from).collect(),
        resources: context.resources().iter().map(ResourceSummary::from).collect(),
        prompts: context.prompts().iter().map(PromptSummary::from).collect(),
        roots: context.roots().iter().map(RootSummary::from).collect(),
    }))
}
