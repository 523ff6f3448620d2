use super::super::dto::{ErrorResponse, UsersResponse};
use super::super::error::{ApiResult, api_error, backend_unavailable, not_connected};
use super::super::state::ServerState;
use crate::constants::USERS_ALL_URI;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/users",
    tag = "backend",
    responses(
        (status = 200, description = "Every stored user record", body = UsersResponse),
        (status = 500, description = "Backend failure or malformed listing", body = ErrorResponse),
        (status = 503, description = "Backend session not established or lost", body = ErrorResponse)
    )
)]
pub async fn users_handler(State(state): State<Arc<ServerState>>) -> ApiResult<UsersResponse> {
    let context = state.context().ok_or_else(not_connected)?;

    let fail = |detail: String| {
        error!(%detail, "Listing users failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error fetching users: {detail}"),
        )
    };

    let result = context
        .session()
        .read_resource(USERS_ALL_URI)
        .await
        .map_err(|err| {
            if err.is_fatal() {
                error!(%err, "Backend session lost while listing users");
                backend_unavailable(&err)
            } else {
                fail(err.to_string())
            }
        })?;
    let text = result.first_text().unwrap_or("[]");
    let users = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(users)) => users,
        Ok(_) => return Err(fail("expected a JSON array".to_string())),
        Err(err) => return Err(fail(err.to_string())),
    };

    Ok(Json(UsersResponse {
        count: users.len(),
        users,
    }))
}
