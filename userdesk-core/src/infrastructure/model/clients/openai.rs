//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::base::{HttpClientBase, KeyPlacement};
use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::domain::{FunctionCall, Turn};
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelReply, ModelRequest};

/// OpenAI-compatible client (works with OpenAI, Groq, LM Studio, Ollama's `/v1`, etc.)
#[derive(Clone)]
pub struct OpenAiClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAiClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let payload = build_payload(request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            turns = request.turns.len(),
            functions = request.functions.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAiResponse = self.base.post_json(&url, &payload, KeyPlacement::OptionalBearer).await?;
        let reply = parse_reply(&self.base.id, response)?;
        debug!(
            function_call = matches!(reply, ModelReply::FunctionCall(_)),
            "Received response from OpenAI-compatible provider"
        );
        Ok(reply)
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    stream: bool,
}

fn build_payload(request: &ModelRequest) -> OpenAiRequest {
    let mut messages = Vec::with_capacity(request.turns.len() + 1);
    if let Some(system) = request.system.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.extend(request.turns.iter().map(turn_to_message));

    let tools = request
        .functions
        .iter()
        .map(|schema| {
            let parameters = schema
                .parameters
                .as_ref()
                .map(|p| p.to_object_schema())
                .unwrap_or_else(|| json!({ "type": "object", "properties": {} }));
            json!({
                "type": "function",
                "function": {
                    "name": schema.name,
                    "description": schema.description,
                    "parameters": parameters,
                }
            })
        })
        .collect();

    OpenAiRequest {
        model: request.model.clone(),
        messages,
        tools,
        stream: false,
    }
}

fn call_id(name: &str, id: Option<&str>) -> String {
    id.map(str::to_string).unwrap_or_else(|| format!("call_{name}"))
}

fn turn_to_message(turn: &Turn) -> Value {
    match turn {
        Turn::User(text) => json!({ "role": "user", "content": text }),
        Turn::FunctionCall(call) => json!({
            "role": "assistant",
            "content": Value::Null,
            "tool_calls": [{
                "id": call_id(&call.name, call.id.as_deref()),
                "type": "function",
                "function": {
                    "name": call.name,
                    "arguments": Value::Object(call.args.clone()).to_string(),
                }
            }]
        }),
        Turn::FunctionResponse {
            name,
            result,
            call_id: id,
        } => json!({
            "role": "tool",
            "tool_call_id": call_id(name, id.as_deref()),
            "name": name,
            "content": json!({ "result": result }).to_string(),
        }),
    }
}

fn parse_reply(provider: &str, response: OpenAiResponse) -> Result<ModelReply, ModelError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .ok_or_else(|| ModelError::invalid_response(provider, "missing message"))?;

    if let Some(tool_call) = message.tool_calls.into_iter().next() {
        let raw = tool_call.function.arguments.trim();
        let args = if raw.is_empty() {
            Map::new()
        } else {
            serde_json::from_str::<Map<String, Value>>(raw).map_err(|err| {
                ModelError::invalid_response(provider, format!("tool call arguments: {err}"))
            })?
        };
        return Ok(ModelReply::FunctionCall(FunctionCall {
            name: tool_call.function.name,
            args,
            id: tool_call.id,
        }));
    }

    Ok(ModelReply::Text(message.content.unwrap_or_default()))
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAiToolCall>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: Option<String>,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}
