//! One pass over every backend capability, failing on the first surprise.

use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;
use userdesk_core::constants::USERS_ALL_URI;
use userdesk_core::session::{BackendSession, SessionError};
use userdesk_core::types::Arguments;

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("{step}: {source}")]
    Session {
        step: &'static str,
        #[source]
        source: SessionError,
    },
    #[error("{step}: {reason}")]
    Check { step: &'static str, reason: String },
}

fn check(step: &'static str, reason: impl Into<String>) -> SmokeError {
    SmokeError::Check {
        step,
        reason: reason.into(),
    }
}

fn session_err(step: &'static str) -> impl FnOnce(SessionError) -> SmokeError {
    move |source| SmokeError::Session { step, source }
}

/// Steps that passed, in order.
#[derive(Debug, Default)]
pub struct SmokeReport {
    pub steps: Vec<String>,
}

impl SmokeReport {
    fn pass(&mut self, line: String) {
        info!(step = %line, "Smoke step passed");
        self.steps.push(line);
    }
}

pub async fn run(session: &dyn BackendSession) -> Result<SmokeReport, SmokeError> {
    let mut report = SmokeReport::default();

    let tools = session.list_tools().await.map_err(session_err("list tools"))?;
    let resources = session
        .list_resources()
        .await
        .map_err(session_err("list resources"))?;
    let prompts = session.list_prompts().await.map_err(session_err("list prompts"))?;
    if !tools.iter().any(|t| t.name == "create-user") {
        return Err(check("list tools", "create-user is not offered"));
    }
    report.pass(format!(
        "capabilities: {} tools, {} resources, {} prompts",
        tools.len(),
        resources.len(),
        prompts.len()
    ));

    let before = count_users(session, "read users").await?;
    report.pass(format!("{USERS_ALL_URI} lists {before} users"));

    let mut args = Arguments::new();
    for (key, value) in [
        ("name", "Smoke Test"),
        ("email", "smoke@example.com"),
        ("address", "1 Test Way"),
        ("phone", "555-0199"),
    ] {
        args.insert(key.to_string(), json!(value));
    }
    let created = session
        .call_tool("create-user", args)
        .await
        .map_err(session_err("create user"))?;
    if created.is_error {
        return Err(check("create user", created.text()));
    }
    report.pass(created.text());

    let after = count_users(session, "re-read users").await?;
    if after != before + 1 {
        return Err(check(
            "re-read users",
            format!("expected {} users, found {after}", before + 1),
        ));
    }
    report.pass(format!("{USERS_ALL_URI} now lists {after} users"));

    let file_uri = resources
        .iter()
        .map(|r| r.uri.as_str())
        .find(|uri| uri.starts_with("file://"))
        .ok_or_else(|| check("read file", "no file:// resource is listed"))?;
    let file = session
        .read_resource(file_uri)
        .await
        .map_err(session_err("read file"))?;
    let parsed = file
        .first_text()
        .and_then(|text| serde_json::from_str::<Value>(text).ok());
    if !parsed.as_ref().is_some_and(Value::is_array) {
        return Err(check("read file", format!("{file_uri} is not a JSON array")));
    }
    report.pass(format!("{file_uri} is readable"));

    let directory = file_uri.rsplit_once('/').map_or(file_uri, |(dir, _)| dir);
    let escape = format!("{directory}/../../../../etc/passwd");
    match session.read_resource(&escape).await {
        Err(SessionError::AccessDenied(_)) => report.pass("traversal outside the data directory is denied".to_string()),
        Ok(_) => return Err(check("traversal", format!("{escape} was readable"))),
        Err(other) => return Err(check("traversal", format!("expected access denied, got: {other}"))),
    }

    let mut prompt_args = Arguments::new();
    prompt_args.insert("name".to_string(), json!("Smoke Test"));
    let prompt = session
        .get_prompt("generate-fake-user", prompt_args)
        .await
        .map_err(session_err("get prompt"))?;
    let rendered = prompt.messages.first().and_then(|m| m.content.as_text());
    if !rendered.is_some_and(|text| text.contains("Smoke Test")) {
        return Err(check("get prompt", "prompt text does not mention the name"));
    }
    report.pass("generate-fake-user renders".to_string());

    Ok(report)
}

async fn count_users(session: &dyn BackendSession, step: &'static str) -> Result<usize, SmokeError> {
    let result = session
        .read_resource(USERS_ALL_URI)
        .await
        .map_err(session_err(step))?;
    let text = result
        .first_text()
        .ok_or_else(|| check(step, "no text content"))?;
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(users)) => Ok(users.len()),
        _ => Err(check(step, "listing is not a JSON array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use userdesk_core::types::{
        ContentBlock, GetPromptResult, PromptDescriptor, PromptMessage, ReadResourceResult,
        ResourceContents, ResourceDescriptor, Role, ToolDescriptor, ToolResult,
    };

    const FILE_URI: &str = "file:///srv/data/users.json";

    struct FakeBackend {
        users: Mutex<usize>,
        sandboxed: bool,
    }

    impl FakeBackend {
        fn new(sandboxed: bool) -> Self {
            Self {
                users: Mutex::new(2),
                sandboxed,
            }
        }

        fn listing(&self, uri: &str) -> ReadResourceResult {
            let count = *self.users.lock().expect("lock");
            let users: Vec<Value> = (1..=count).map(|id| json!({ "id": id })).collect();
            ReadResourceResult {
                contents: vec![ResourceContents::text(uri, None, Value::Array(users).to_string())],
            }
        }
    }

    #[async_trait]
    impl BackendSession for FakeBackend {
        async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
            Ok(vec![ToolDescriptor::new("create-user", "", json!({}))])
        }

        async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SessionError> {
            Ok(vec![ResourceDescriptor {
                uri: FILE_URI.to_string(),
                name: "Users JSON File".to_string(),
                description: None,
                mime_type: None,
            }])
        }

        async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>, SessionError> {
            Ok(Vec::new())
        }

        async fn call_tool(&self, _name: &str, _args: Arguments) -> Result<ToolResult, SessionError> {
            let mut users = self.users.lock().expect("lock");
            *users += 1;
            Ok(ToolResult::success(format!("User {} created successfully", *users)))
        }

        async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, SessionError> {
            if uri == USERS_ALL_URI || uri == FILE_URI || !self.sandboxed {
                return Ok(self.listing(uri));
            }
            Err(SessionError::AccessDenied(uri.to_string()))
        }

        async fn get_prompt(&self, _name: &str, args: Arguments) -> Result<GetPromptResult, SessionError> {
            let name = args.get("name").and_then(Value::as_str).unwrap_or_default();
            Ok(GetPromptResult {
                description: None,
                messages: vec![PromptMessage {
                    role: Role::User,
                    content: ContentBlock::text(format!("Generate a fake user with the name {name}.")),
                }],
            })
        }
    }

    #[tokio::test]
    async fn passes_against_a_well_behaved_backend() {
        let report = run(&FakeBackend::new(true)).await.expect("smoke passes");

        assert_eq!(report.steps.len(), 7);
        assert_eq!(report.steps[2], "User 3 created successfully");
        assert_eq!(report.steps[3], "users://all now lists 3 users");
    }

    #[tokio::test]
    async fn fails_when_traversal_is_allowed() {
        let err = run(&FakeBackend::new(false)).await.expect_err("escape detected");

        assert!(matches!(err, SmokeError::Check { step: "traversal", .. }));
    }
}
