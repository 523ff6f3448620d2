// REST gateway over a live session with the user-record service and a
// scripted model standing in for Gemini.

#[path = "../common/mod.rs"]
mod common;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::{in_process_session, roots, seeded_data_dir};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use userdesk_core::agent::AgentOptions;
use userdesk_core::domain::FunctionCall;
use userdesk_core::model::{ModelError, ModelProvider, ModelReply, ModelRequest};
use userdesk_core::server::{self, AppContext, ServerState};
use userdesk_core::session::BackendSession;

struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
}

impl ScriptedModel {
    fn new(replies: Vec<ModelReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
        })
    }
}

#[async_trait]
impl ModelProvider for ScriptedModel {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _request: &ModelRequest) -> Result<ModelReply, ModelError> {
        self.replies
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| ModelError::invalid_response("scripted", "no reply left"))
    }
}

fn call(name: &str, args: Value) -> ModelReply {
    let Value::Object(args) = args else {
        panic!("arguments must be an object");
    };
    ModelReply::FunctionCall(FunctionCall::new(name, args))
}

async fn gateway(replies: Vec<ModelReply>) -> (TempDir, Router) {
    let dir = seeded_data_dir();
    let data = dir.path().join("data");
    let session: Arc<dyn BackendSession> = Arc::new(in_process_session(&data).await);
    let context = AppContext::establish(
        session,
        ScriptedModel::new(replies),
        AgentOptions::new("gemini-2.0-flash"),
        None,
        roots(&data),
    )
    .await
    .expect("context");
    let app = server::router(Arc::new(ServerState::new(context)), &[]);
    (dir, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_connected_session() {
    let (_dir, app) = gateway(vec![]).await;

    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mcp_connected"], true);
}

#[tokio::test]
async fn chat_creates_a_user_visible_through_users_route() {
    let (_dir, app) = gateway(vec![
        call(
            "create-user",
            json!({ "name": "Cara", "email": "cara@example.com", "address": "3 Rd", "phone": "555-0003" }),
        ),
        ModelReply::Text("Cara was added as user 3.".to_string()),
    ])
    .await;

    let (status, body) = send(&app, "POST", "/chat", Some(json!({ "message": "Add Cara" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Cara was added as user 3.");
    assert_eq!(body["outcome"], "answer");
    assert_eq!(body["tool_calls"][0]["result"], "User 3 created successfully");

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["users"][2]["name"], "Cara");
}

#[tokio::test]
async fn capabilities_come_from_the_backend() {
    let (_dir, app) = gateway(vec![]).await;

    let (_, body) = send(&app, "GET", "/capabilities", None).await;

    let uris: Vec<&str> = body["resources"]
        .as_array()
        .expect("resources")
        .iter()
        .filter_map(|r| r["uri"].as_str())
        .collect();
    assert_eq!(uris[0], "users://all");
    assert_eq!(uris[1], "users://{userId}/profile");
    assert!(uris[2].starts_with("file://") && uris[2].ends_with("/users.json"));
    assert_eq!(body["prompts"][0]["name"], "generate-fake-user");
}

#[tokio::test]
async fn resource_route_maps_sandbox_and_lookup_failures() {
    let (dir, app) = gateway(vec![]).await;

    let secret = format!("file://{}", dir.path().join("secret.txt").display());
    let (status, _) = send(&app, "POST", "/resources/read", Some(json!({ "uri": secret }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", "/resources/read", Some(json!({ "uri": "users://9/profile" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", "/resources/read", Some(json!({ "uri": "users://2/profile" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "json");
    assert_eq!(body["data"]["name"], "Linus");
}

#[tokio::test]
async fn direct_tool_calls_always_answer_200() {
    let (_dir, app) = gateway(vec![]).await;

    let (status, body) = send(
        &app,
        "POST",
        "/tools/call",
        Some(json!({ "tool_name": "create-user", "arguments": { "name": "NoEmail" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"], "Failed to save user: missing required argument 'email'");

    let (status, body) = send(&app, "POST", "/tools/call", Some(json!({ "tool_name": "nope" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}
