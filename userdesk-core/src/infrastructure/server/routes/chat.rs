use super::super::dto::{ChatRequest, ChatResponse, ErrorResponse};
use super::super::error::{ApiResult, api_error, backend_unavailable, not_connected};
use super::super::state::ServerState;
use crate::agent::AgentError;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info};

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Query answered or iteration budget exhausted", body = ChatResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 500, description = "Model or backend failure", body = ErrorResponse),
        (status = 503, description = "Backend session not established or lost", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let context = state.context().ok_or_else(not_connected)?;

    if payload.message.trim().is_empty() {
        error!("Rejecting /chat request due to empty message");
        return Err(api_error(StatusCode::BAD_REQUEST, "Message cannot be empty"));
    }

    info!(chars = payload.message.len(), "Received /chat request");
    match context.agent().run(payload.message).await {
        Ok(outcome) => {
            info!(
                outcome = outcome.outcome.kind(),
                tool_calls = outcome.tool_calls.len(),
                exchanges = outcome.exchanges,
                "Chat request completed"
            );
            Ok(Json(ChatResponse::from(outcome)))
        }
        Err(AgentError::Backend(err)) if err.is_fatal() => {
            error!(%err, "Backend session lost during chat");
            Err(backend_unavailable(&err))
        }
        Err(err) => {
            error!(%err, "Agent run failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Chat error: {}", err.user_message()),
            ))
        }
    }
}
