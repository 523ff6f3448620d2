//! Scripted stand-ins for the model provider and backend session.

use crate::application::session::{BackendSession, SessionError};
use crate::domain::types::{
    Arguments, ContentBlock, GetPromptResult, PromptArgument, PromptDescriptor, PromptMessage,
    ReadResourceResult, ResourceContents, ResourceDescriptor, Role, ToolDescriptor, ToolResult,
};
use crate::domain::{FunctionCall, Turn};
use crate::infrastructure::model::{ModelError, ModelProvider, ModelReply, ModelRequest};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub(crate) enum Scripted {
    Reply(ModelReply),
    Fail,
    Stall(Duration),
}

#[derive(Clone)]
pub(crate) struct ScriptedProvider {
    script: Arc<Mutex<Vec<Scripted>>>,
    repeat: Option<Arc<dyn Fn(usize) -> ModelReply + Send + Sync>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            repeat: None,
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every request with `reply(n)` where `n` counts from zero.
    pub(crate) fn endless(reply: impl Fn(usize) -> ModelReply + Send + Sync + 'static) -> Self {
        Self {
            repeat: Some(Arc::new(reply)),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

pub(crate) fn text(reply: &str) -> Scripted {
    Scripted::Reply(ModelReply::Text(reply.to_string()))
}

pub(crate) fn call(name: &str, args: Value) -> Scripted {
    Scripted::Reply(function_call(name, args))
}

pub(crate) fn function_call(name: &str, args: Value) -> ModelReply {
    let args = match args {
        Value::Object(map) => map,
        _ => Arguments::new(),
    };
    ModelReply::FunctionCall(FunctionCall::new(name, args))
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        let index = {
            let mut recordings = self.recordings.lock().await;
            recordings.push(request.clone());
            recordings.len() - 1
        };
        if let Some(repeat) = &self.repeat {
            return Ok(repeat(index));
        }

        let next = {
            let mut script = self.script.lock().await;
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Stall(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(ModelReply::Text("too late".to_string()))
            }
            Some(Scripted::Fail) | None => {
                Err(ModelError::invalid_response("scripted", "script exhausted"))
            }
        }
    }
}

/// In-memory backend modelled on the user-record server.
pub(crate) struct StubSession {
    tools: Vec<ToolDescriptor>,
    results: HashMap<String, ToolResult>,
    terminated: bool,
    users: Mutex<Vec<Value>>,
    calls: Mutex<Vec<(String, Arguments)>>,
    closed: Mutex<bool>,
}

impl StubSession {
    pub(crate) fn new() -> Self {
        Self {
            tools: vec![
                ToolDescriptor::new(
                    "create-user",
                    "Create a new user in the database",
                    json!({
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "email": { "type": "string" },
                            "address": { "type": "string" },
                            "phone": { "type": "string" }
                        },
                        "required": ["name", "email", "address", "phone"]
                    }),
                ),
                ToolDescriptor::new(
                    "create-random-user",
                    "Create a random user with fake data",
                    json!({ "type": "object", "properties": {} }),
                ),
            ],
            results: HashMap::new(),
            terminated: false,
            users: Mutex::new(vec![
                json!({ "id": 1, "name": "Ada", "email": "ada@example.com", "address": "1 Loop", "phone": "555-0001" }),
                json!({ "id": 2, "name": "Linus", "email": "linus@example.com", "address": "2 Tree", "phone": "555-0002" }),
            ]),
            calls: Mutex::new(Vec::new()),
            closed: Mutex::new(false),
        }
    }

    pub(crate) fn with_result(mut self, tool: &str, result: ToolResult) -> Self {
        self.results.insert(tool.to_string(), result);
        self
    }

    /// Every call fails as if the backend process had exited.
    pub(crate) fn terminated(mut self) -> Self {
        self.terminated = true;
        self
    }

    pub(crate) fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.clone()
    }

    pub(crate) async fn calls(&self) -> Vec<(String, Arguments)> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn is_closed(&self) -> bool {
        *self.closed.lock().await
    }
}

#[async_trait]
impl BackendSession for StubSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
        Ok(self.tools.clone())
    }

    async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SessionError> {
        Ok(vec![ResourceDescriptor {
            uri: "users://all".to_string(),
            name: "All Users".to_string(),
            description: Some("Get all users data from the database".to_string()),
            mime_type: Some("application/json".to_string()),
        }])
    }

    async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>, SessionError> {
        Ok(vec![PromptDescriptor {
            name: "generate-fake-user".to_string(),
            description: Some("Generate a fake user based on a given name".to_string()),
            arguments: vec![PromptArgument {
                name: "name".to_string(),
                description: Some("The name of the user to generate".to_string()),
                required: true,
            }],
        }])
    }

    async fn call_tool(&self, name: &str, args: Arguments) -> Result<ToolResult, SessionError> {
        if self.terminated {
            return Err(SessionError::Terminated);
        }
        self.calls.lock().await.push((name.to_string(), args.clone()));
        if let Some(result) = self.results.get(name) {
            return Ok(result.clone());
        }
        match name {
            "create-user" => {
                let mut users = self.users.lock().await;
                let id = users.len() + 1;
                let mut record = args;
                record.insert("id".to_string(), json!(id));
                users.push(Value::Object(record));
                Ok(ToolResult::success(format!("User {id} created successfully")))
            }
            "create-random-user" => Ok(ToolResult::success("User 3 created successfully: Jo Doe (jo@example.com)")),
            other => Err(SessionError::UnknownTool(other.to_string())),
        }
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, SessionError> {
        if self.terminated {
            return Err(SessionError::Terminated);
        }
        match uri {
            "users://all" => {
                let users = self.users.lock().await;
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(
                        uri,
                        Some("application/json"),
                        Value::Array(users.clone()).to_string(),
                    )],
                })
            }
            "notes://plain" => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(uri, Some("text/plain"), "not json")],
            }),
            "notes://empty" => Ok(ReadResourceResult::default()),
            _ if uri.starts_with("file:///etc") => Err(SessionError::AccessDenied(uri.to_string())),
            _ => Err(SessionError::UnknownResource(uri.to_string())),
        }
    }

    async fn get_prompt(&self, name: &str, args: Arguments) -> Result<GetPromptResult, SessionError> {
        if name != "generate-fake-user" {
            return Err(SessionError::Rpc {
                code: -32602,
                message: format!("Unknown prompt: {name}"),
            });
        }
        let who = args.get("name").and_then(Value::as_str).unwrap_or_default();
        Ok(GetPromptResult {
            description: None,
            messages: vec![PromptMessage {
                role: Role::User,
                content: ContentBlock::text(format!("Generate a fake user with the name {who}.")),
            }],
        })
    }

    async fn close(&self) {
        *self.closed.lock().await = true;
    }
}

/// Tool results the model saw, in order.
pub(crate) fn function_responses(request: &ModelRequest) -> Vec<(String, String)> {
    request
        .turns
        .iter()
        .filter_map(|turn| match turn {
            Turn::FunctionResponse { name, result, .. } => Some((name.clone(), result.clone())),
            _ => None,
        })
        .collect()
}
