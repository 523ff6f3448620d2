use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_REQUEST_TIMEOUT_SECS};
use serde::Deserialize;
use std::time::Duration;

/// Loop budget and suspension-point timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    pub max_iterations: usize,
    pub model_timeout: Option<Duration>,
    pub tool_timeout: Option<Duration>,
    /// Deadline for each backend JSON-RPC request; `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: None,
            tool_timeout: None,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawAgent {
    pub(super) max_iterations: Option<usize>,
    pub(super) model_timeout_secs: Option<u64>,
    pub(super) tool_timeout_secs: Option<u64>,
    pub(super) request_timeout_secs: Option<u64>,
}

impl From<RawAgent> for AgentConfig {
    fn from(raw: RawAgent) -> Self {
        // 0 disables the backend request deadline.
        let request_timeout = match raw.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            max_iterations: raw.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            model_timeout: raw.model_timeout_secs.map(Duration::from_secs),
            tool_timeout: raw.tool_timeout_secs.map(Duration::from_secs),
            request_timeout,
        }
    }
}
