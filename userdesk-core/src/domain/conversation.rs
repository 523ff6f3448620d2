//! Conversation state owned by the agent loop for one request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A model's request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    /// Provider-assigned call id, echoed back with the function response
    /// by APIs that correlate calls that way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
            id: None,
        }
    }
}

/// One entry in the ordered exchange between caller, model and tools.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    User(String),
    FunctionCall(FunctionCall),
    FunctionResponse {
        name: String,
        result: String,
        call_id: Option<String>,
    },
}

impl Turn {
    pub fn response_to(call: &FunctionCall, result: impl Into<String>) -> Self {
        Turn::FunctionResponse {
            name: call.name.clone(),
            result: result.into(),
            call_id: call.id.clone(),
        }
    }
}
