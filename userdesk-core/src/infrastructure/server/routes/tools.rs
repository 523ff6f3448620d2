use super::super::dto::{ErrorResponse, ToolCallRequest, ToolCallResponse};
use super::super::error::{ApiResult, not_connected};
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, warn};

#[utoipa::path(
    post,
    path = "/tools/call",
    tag = "backend",
    request_body = ToolCallRequest,
    responses(
        (status = 200, description = "Tool outcome; failures carry success=false", body = ToolCallResponse),
        (status = 503, description = "Backend session not established", body = ErrorResponse)
    )
)]
pub async fn call_tool_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<ToolCallRequest>,
) -> ApiResult<ToolCallResponse> {
    let context = state.context().ok_or_else(not_connected)?;
    let ToolCallRequest { tool_name, arguments } = payload;

    info!(tool = %tool_name, "Received /tools/call request");
    let response = match context.executor().execute(&tool_name, arguments).await {
        Ok(result) => ToolCallResponse {
            result,
            success: true,
        },
        Err(err) => {
            warn!(tool = %tool_name, %err, "Direct tool call failed");
            ToolCallResponse {
                result: err.user_message(),
                success: false,
            }
        }
    };
    Ok(Json(response))
}
