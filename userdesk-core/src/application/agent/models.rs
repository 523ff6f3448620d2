use crate::config::AppConfig;
use crate::constants::{DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_REACHED};
use crate::domain::types::Arguments;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub model: String,
    pub system_prompt: Option<String>,
    /// Tool executions allowed per request.
    pub max_iterations: usize,
    pub model_timeout: Option<Duration>,
}

impl AgentOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_iterations: config.agent.max_iterations,
            model_timeout: config.agent.model_timeout,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// How a request ended. Running out of budget is not an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Answer(String),
    MaxIterationsReached { ceiling: usize },
}

impl TurnOutcome {
    /// The answer text, or the fixed sentinel when the budget ran out.
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Answer(text) => text,
            TurnOutcome::MaxIterationsReached { .. } => MAX_ITERATIONS_REACHED,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, TurnOutcome::Answer(_))
    }

    /// Stable label for APIs and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnOutcome::Answer(_) => "answer",
            TurnOutcome::MaxIterationsReached { .. } => "max_iterations_reached",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub arguments: Arguments,
    pub result: String,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub outcome: TurnOutcome,
    /// Every tool executed, including those before the budget ran out.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model round trips.
    pub exchanges: usize,
}
