use crate::application::session::SessionError;
use crate::infrastructure::model::ModelError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("backend session failed: {0}")]
    Backend(#[source] SessionError),
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Model(err) => err.user_message(),
            AgentError::Backend(err) => format!("The tool server is unavailable: {err}"),
        }
    }
}

/// Why a single tool invocation produced no usable result.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    /// The tool ran and reported failure through its result content.
    #[error("{0}")]
    Reported(String),
    #[error("tool '{tool}' did not finish within {after:?}")]
    Timeout { tool: String, after: Duration },
    #[error("failed to execute tool '{tool}': {source}")]
    Session {
        tool: String,
        #[source]
        source: SessionError,
    },
}

impl ExecutionError {
    pub fn user_message(&self) -> String {
        match self {
            ExecutionError::UnknownTool(name) => {
                format!("Tool \"{name}\" is not offered by the server.")
            }
            ExecutionError::Reported(message) => message.clone(),
            ExecutionError::Timeout { tool, after } => {
                format!("Tool \"{tool}\" timed out after {}s.", after.as_secs())
            }
            ExecutionError::Session { tool, source } => {
                format!("Executing tool \"{tool}\" failed: {source}")
            }
        }
    }
}
