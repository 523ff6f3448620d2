use crate::agent::{AgentOutcome, ToolCallRecord};
use crate::domain::types::{PromptArgument, PromptDescriptor, ResourceDescriptor, Root, ToolDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub mcp_connected: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolSummary {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub input_schema: Value,
}

impl From<&ToolDescriptor> for ToolSummary {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.input_schema.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceSummary {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    pub mime_type: Option<String>,
}

impl From<&ResourceDescriptor> for ResourceSummary {
    fn from(resource: &ResourceDescriptor) -> Self {
        Self {
            uri: resource.uri.clone(),
            name: resource.name.clone(),
            description: resource.description.clone(),
            mime_type: resource.mime_type.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptArgumentSummary {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptSummary {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<PromptArgumentSummary>,
}

impl From<&PromptDescriptor> for PromptSummary {
    fn from(prompt: &PromptDescriptor) -> Self {
        Self {
            name: prompt.name.clone(),
            description: prompt.description.clone(),
            arguments: prompt
                .arguments
                .iter()
                .map(|PromptArgument { name, description, required }| PromptArgumentSummary {
                    name: name.clone(),
                    description: description.clone(),
                    required: *required,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootSummary {
    pub uri: String,
    pub name: Option<String>,
}

impl From<&Root> for RootSummary {
    fn from(root: &Root) -> Self {
        Self {
            uri: root.uri.clone(),
            name: root.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CapabilitiesResponse {
    pub tools: Vec<ToolSummary>,
    pub resources: Vec<ResourceSummary>,
    pub prompts: Vec<PromptSummary>,
    pub roots: Vec<RootSummary>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolCallLog {
    pub tool: String,
    #[schema(value_type = Object)]
    pub arguments: Map<String, Value>,
    pub result: String,
    pub success: bool,
}

impl From<ToolCallRecord> for ToolCallLog {
    fn from(record: ToolCallRecord) -> Self {
        Self {
            tool: record.tool,
            arguments: record.arguments,
            result: record.result,
            success: record.success,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallLog>>,
    /// `answer` or `max_iterations_reached`
    pub outcome: String,
}

impl From<AgentOutcome> for ChatResponse {
    fn from(outcome: AgentOutcome) -> Self {
        let tool_calls = (!outcome.tool_calls.is_empty())
            .then(|| outcome.tool_calls.into_iter().map(ToolCallLog::from).collect());
        Self {
            response: outcome.outcome.text().to_string(),
            tool_calls,
            outcome: outcome.outcome.kind().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolCallRequest {
    pub tool_name: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolCallResponse {
    pub result: String,
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceReadRequest {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceReadResponse {
    #[schema(value_type = Object)]
    pub data: Value,
    /// `json`, `text` or `none`
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResourceReadResponse {
    /// JSON when the text parses as JSON, raw text otherwise.
    pub fn from_text(text: Option<&str>) -> Self {
        match text {
            None => Self {
                data: Value::Null,
                kind: "none".to_string(),
            },
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(data) => Self {
                    data,
                    kind: "json".to_string(),
                },
                Err(_) => Self {
                    data: Value::String(text.to_string()),
                    kind: "text".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    #[schema(value_type = Vec<Object>)]
    pub users: Vec<Value>,
    pub count: usize,
}
