use super::errors::ExecutionError;
use crate::application::catalog::ToolCatalog;
use crate::application::session::{BackendSession, SessionError};
use crate::domain::types::Arguments;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs named tools against the backend and flattens their results to text.
#[derive(Clone)]
pub struct ToolExecutor {
    session: Arc<dyn BackendSession>,
    catalog: Arc<ToolCatalog>,
    timeout: Option<Duration>,
}

impl ToolExecutor {
    pub fn new(session: Arc<dyn BackendSession>, catalog: Arc<ToolCatalog>) -> Self {
        Self {
            session,
            catalog,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Calls `name` with `args` and returns the concatenated text blocks.
    ///
    /// Names missing from the catalog are rejected without contacting the
    /// backend. A result flagged `isError` becomes [`ExecutionError::Reported`].
    pub async fn execute(&self, name: &str, args: Arguments) -> Result<String, ExecutionError> {
        if !self.catalog.contains(name) {
            warn!(tool = name, "model requested a tool that is not in the catalog");
            return Err(ExecutionError::UnknownTool(name.to_string()));
        }

        let call = self.session.call_tool(name, args);
        let outcome = match self.timeout {
            Some(after) => tokio::time::timeout(after, call).await.map_err(|_| {
                ExecutionError::Timeout {
                    tool: name.to_string(),
                    after,
                }
            })?,
            None => call.await,
        };

        let result = outcome.map_err(|source| match source {
            SessionError::UnknownTool(tool) => ExecutionError::UnknownTool(tool),
            SessionError::Timeout { after, .. } => ExecutionError::Timeout {
                tool: name.to_string(),
                after,
            },
            source => ExecutionError::Session {
                tool: name.to_string(),
                source,
            },
        })?;

        let text = result.text();
        debug!(tool = name, is_error = result.is_error, chars = text.len(), "tool finished");
        if result.is_error {
            return Err(ExecutionError::Reported(text));
        }
        Ok(text)
    }
}
