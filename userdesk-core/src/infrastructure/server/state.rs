use crate::agent::{Agent, AgentOptions, ToolExecutor};
use crate::application::catalog::ToolCatalog;
use crate::application::session::{BackendSession, SessionError};
use crate::application::tooling::{ClientHandlers, McpSession};
use crate::config::AppConfig;
use crate::domain::types::{PromptDescriptor, ResourceDescriptor, Root, ToolDescriptor};
use crate::model::ModelProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything a request handler needs once the backend session is up.
///
/// Capability listings are fetched once at startup and cached for the
/// session's lifetime.
pub struct AppContext {
    session: Arc<dyn BackendSession>,
    tools: Vec<ToolDescriptor>,
    resources: Vec<ResourceDescriptor>,
    prompts: Vec<PromptDescriptor>,
    roots: Vec<Root>,
    executor: ToolExecutor,
    agent: Agent,
}

impl AppContext {
    /// Spawns the configured backend and caches its capabilities.
    pub async fn connect(
        config: &AppConfig,
        provider: Arc<dyn ModelProvider>,
    ) -> Result<Self, SessionError> {
        let roots = config.roots.roots();
        let handlers = ClientHandlers::new(roots.clone())
            .with_sampling(Arc::clone(&provider), config.model.clone());
        let session = McpSession::connect(&config.server, handlers, config.agent.request_timeout).await?;
        let session: Arc<dyn BackendSession> = Arc::new(session);

        let options = AgentOptions::from_config(config);
        match Self::establish(Arc::clone(&session), provider, options, config.agent.tool_timeout, roots).await {
            Ok(context) => Ok(context),
            Err(err) => {
                session.close().await;
                Err(err)
            }
        }
    }

    pub async fn establish(
        session: Arc<dyn BackendSession>,
        provider: Arc<dyn ModelProvider>,
        options: AgentOptions,
        tool_timeout: Option<Duration>,
        roots: Vec<Root>,
    ) -> Result<Self, SessionError> {
        let tools = session.list_tools().await?;
        let resources = session.list_resources().await?;
        let prompts = session.list_prompts().await?;
        info!(
            tools = tools.len(),
            resources = resources.len(),
            prompts = prompts.len(),
            "Cached backend capabilities"
        );

        let catalog = Arc::new(ToolCatalog::from_descriptors(&tools));
        let executor = ToolExecutor::new(Arc::clone(&session), catalog).with_timeout(tool_timeout);
        let agent = Agent::new(provider, executor.clone(), options);

        Ok(Self {
            session,
            tools,
            resources,
            prompts,
            roots,
            executor,
            agent,
        })
    }

    pub fn session(&self) -> &Arc<dyn BackendSession> {
        &self.session
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn prompts(&self) -> &[PromptDescriptor] {
        &self.prompts
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

/// Shared router state. `context` is `None` until a backend session exists.
pub struct ServerState {
    context: Option<AppContext>,
}

impl ServerState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub fn disconnected() -> Self {
        Self { context: None }
    }

    pub fn context(&self) -> Option<&AppContext> {
        self.context.as_ref()
    }
}
