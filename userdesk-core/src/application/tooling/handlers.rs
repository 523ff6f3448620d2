//! Answers to requests the backend sends to the client.

use crate::domain::types::{ContentBlock, Root};
use crate::infrastructure::model::ModelProvider;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC error returned to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerError {
    pub code: i64,
    pub message: String,
}

impl HandlerError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "code": self.code, "message": self.message })
    }
}

struct Sampler {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

/// Client-side capabilities: advertised roots and, optionally, sampling
/// backed by a model provider.
#[derive(Default)]
pub struct ClientHandlers {
    roots: Vec<Root>,
    sampler: Option<Sampler>,
}

impl ClientHandlers {
    pub fn new(roots: Vec<Root>) -> Self {
        Self {
            roots,
            sampler: None,
        }
    }

    pub fn with_sampling(mut self, provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        self.sampler = Some(Sampler {
            provider,
            model: model.into(),
        });
        self
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Capabilities object sent in `initialize`.
    pub fn capabilities(&self) -> Value {
        let mut capabilities = json!({ "roots": { "listChanged": false } });
        if self.sampler.is_some() {
            capabilities["sampling"] = json!({});
        }
        capabilities
    }

    pub async fn handle(&self, method: &str, params: Value) -> Result<Value, HandlerError> {
        match method {
            "ping" => Ok(json!({})),
            "roots/list" => Ok(json!({ "roots": self.roots })),
            "sampling/createMessage" => match &self.sampler {
                Some(sampler) => sampler.create_message(params).await,
                None => Err(not_implemented(method)),
            },
            other => Err(not_implemented(other)),
        }
    }
}

fn not_implemented(method: &str) -> HandlerError {
    HandlerError::new(
        METHOD_NOT_FOUND,
        format!("client does not implement method '{method}'"),
    )
}

#[derive(Debug, Deserialize)]
struct CreateMessageParams {
    messages: Vec<SamplingMessage>,
}

#[derive(Debug, Deserialize)]
struct SamplingMessage {
    content: ContentBlock,
}

impl Sampler {
    /// Each text message is completed on its own; replies are joined with `\n`.
    async fn create_message(&self, params: Value) -> Result<Value, HandlerError> {
        let params: CreateMessageParams = serde_json::from_value(params)
            .map_err(|err| HandlerError::new(INVALID_PARAMS, format!("invalid sampling request: {err}")))?;

        let prompts: Vec<&str> = params
            .messages
            .iter()
            .filter_map(|m| m.content.as_text())
            .collect();
        if prompts.is_empty() {
            return Err(HandlerError::new(
                INVALID_PARAMS,
                "sampling request carried no text messages",
            ));
        }

        info!(
            model = self.model.as_str(),
            messages = prompts.len(),
            "Answering sampling request"
        );

        let mut replies = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let reply = self
                .provider
                .complete(&self.model, prompt)
                .await
                .map_err(|err| {
                    warn!(%err, "sampling completion failed");
                    HandlerError::new(INTERNAL_ERROR, err.user_message())
                })?;
            replies.push(reply);
        }

        Ok(json!({
            "role": "assistant",
            "model": self.model,
            "stopReason": "endTurn",
            "content": { "type": "text", "text": replies.join("\n") },
        }))
    }
}
