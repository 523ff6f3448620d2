//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::base::{HttpClientBase, KeyPlacement};
use crate::application::catalog::FunctionSchema;
use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::domain::{FunctionCall, Turn};
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelReply, ModelRequest};

/// Gemini `generateContent` client with function calling.
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
        }
    }

    fn build_model_url(&self, model: &str) -> String {
        self.base.build_url(&format!(
            "{}/{model}:generateContent",
            self.api_path.trim_matches('/')
        ))
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        let url = self.build_model_url(&request.model);
        let payload = build_payload(request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            turns = request.turns.len(),
            functions = request.functions.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_json(&url, &payload, KeyPlacement::QueryParam).await?;
        let reply = parse_reply(&self.base.id, response)?;
        debug!(
            function_call = matches!(reply, ModelReply::FunctionCall(_)),
            "Received response from Gemini"
        );
        Ok(reply)
    }
}

fn build_payload(request: &ModelRequest) -> Value {
    let contents: Vec<Value> = request.turns.iter().map(turn_to_content).collect();
    let mut payload = json!({ "contents": contents });

    if let Some(system) = request.system.as_deref().filter(|s| !s.trim().is_empty()) {
        payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    if !request.functions.is_empty() {
        let declarations: Vec<Value> = request.functions.iter().map(declaration).collect();
        payload["tools"] = json!([{ "functionDeclarations": declarations }]);
    }
    payload
}

fn declaration(schema: &FunctionSchema) -> Value {
    let mut decl = json!({
        "name": schema.name,
        "description": schema.description,
    });
    if let Some(params) = &schema.parameters {
        decl["parameters"] = params.to_object_schema();
    }
    decl
}

fn turn_to_content(turn: &Turn) -> Value {
    match turn {
        Turn::User(text) => json!({ "role": "user", "parts": [{ "text": text }] }),
        Turn::FunctionCall(call) => json!({
            "role": "model",
            "parts": [{ "functionCall": { "name": call.name, "args": call.args } }]
        }),
        Turn::FunctionResponse { name, result, .. } => json!({
            "role": "user",
            "parts": [{
                "functionResponse": { "name": name, "response": { "result": result } }
            }]
        }),
    }
}

/// The first `functionCall` part of the first candidate wins; otherwise all
/// text parts are concatenated.
fn parse_reply(provider: &str, response: GeminiResponse) -> Result<ModelReply, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::invalid_response(provider, "no candidates returned"))?;
    let parts = candidate
        .content
        .map(|c| c.parts)
        .ok_or_else(|| ModelError::invalid_response(provider, "candidate has no content"))?;

    let mut text = String::new();
    for part in parts {
        if let Some(call) = part.function_call {
            return Ok(ModelReply::FunctionCall(FunctionCall::new(call.name, call.args)));
        }
        if let Some(chunk) = part.text {
            text.push_str(&chunk);
        }
    }
    Ok(ModelReply::Text(text))
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}
