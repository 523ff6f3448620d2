use super::dto::{
    CapabilitiesResponse, ChatRequest, ChatResponse, ErrorResponse, HealthResponse,
    PromptArgumentSummary, PromptSummary, ResourceReadRequest, ResourceReadResponse,
    ResourceSummary, RootSummary, ToolCallLog, ToolCallRequest, ToolCallResponse, ToolSummary,
    UsersResponse,
};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_handler,
        routes::capabilities::capabilities_handler,
        routes::chat::chat_handler,
        routes::tools::call_tool_handler,
        routes::resources::read_resource_handler,
        routes::users::users_handler
    ),
    components(
        schemas(
            HealthResponse,
            CapabilitiesResponse,
            ToolSummary,
            ResourceSummary,
            PromptSummary,
            PromptArgumentSummary,
            RootSummary,
            ChatRequest,
            ChatResponse,
            ToolCallLog,
            ToolCallRequest,
            ToolCallResponse,
            ResourceReadRequest,
            ResourceReadResponse,
            UsersResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "health", description = "Gateway liveness and session status"),
        (name = "chat", description = "Natural-language queries answered through the tool loop"),
        (name = "backend", description = "Direct access to backend tools and resources")
    )
)]
pub(super) struct ApiDoc;
