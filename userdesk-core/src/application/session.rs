//! The backend surface the orchestration loop and gateway depend on.

use crate::domain::types::{
    Arguments, GetPromptResult, PromptDescriptor, ReadResourceResult, ResourceDescriptor,
    ToolDescriptor, ToolResult,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// JSON-RPC code for invalid params; also used for unknown tools and prompts.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC code the backend uses for an unknown resource URI.
pub const RESOURCE_NOT_FOUND: i64 = -32002;
/// JSON-RPC code the backend uses when a resource read is refused.
pub const ACCESS_DENIED: i64 = -32003;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("backend session is not available: {0}")]
    Unavailable(String),
    #[error("backend transport error: {0}")]
    Transport(String),
    #[error("backend returned an unreadable {method} result: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("backend returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("backend did not answer {method} within {after:?}")]
    Timeout { method: String, after: Duration },
    #[error("backend session terminated")]
    Terminated,
}

impl SessionError {
    /// Maps a JSON-RPC error from `method` about `subject` onto a typed variant.
    pub fn from_rpc(method: &str, subject: &str, code: i64, message: String) -> Self {
        match (method, code) {
            ("resources/read", RESOURCE_NOT_FOUND) => SessionError::UnknownResource(subject.to_string()),
            ("resources/read", ACCESS_DENIED) => SessionError::AccessDenied(message),
            ("tools/call", INVALID_PARAMS) if message.starts_with("Unknown tool") => {
                SessionError::UnknownTool(subject.to_string())
            }
            _ => SessionError::Rpc { code, message },
        }
    }

    /// Whether retrying the same call on the same session can never succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Unavailable(_) | SessionError::Terminated | SessionError::Transport(_)
        )
    }
}

/// Tool/resource/prompt operations offered by a connected backend.
///
/// Implementations must be shareable across concurrent requests.
#[async_trait]
pub trait BackendSession: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError>;

    async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SessionError>;

    async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>, SessionError>;

    /// May mutate backend state; never retried by callers.
    async fn call_tool(&self, name: &str, args: Arguments) -> Result<ToolResult, SessionError>;

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, SessionError>;

    async fn get_prompt(&self, name: &str, args: Arguments) -> Result<GetPromptResult, SessionError>;

    /// Releases the underlying connection.
    async fn close(&self) {}
}
