//! Model traits

use super::types::{ModelError, ModelReply, ModelRequest};
use async_trait::async_trait;

/// A function-calling language model endpoint.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier of the configured provider, used in logs and errors.
    fn id(&self) -> &str;

    /// Send one exchange and return the model's reply.
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError>;

    /// Plain text generation for a single prompt without tools.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        match self.generate(&ModelRequest::prompt(model, prompt)).await? {
            ModelReply::Text(text) => Ok(text),
            ModelReply::FunctionCall(call) => Err(ModelError::invalid_response(
                self.id(),
                format!("unexpected function call '{}' without tools", call.name),
            )),
        }
    }
}
