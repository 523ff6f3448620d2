use super::errors::{AgentError, ExecutionError};
use super::executor::ToolExecutor;
use super::models::{AgentOptions, AgentOutcome, ToolCallRecord, TurnOutcome};
use crate::domain::Turn;
use crate::infrastructure::model::{ModelError, ModelProvider, ModelReply, ModelRequest};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Resolves one user query into an answer, executing the tools the model
/// asks for along the way.
///
/// At most one model call or tool call is outstanding at a time. Tool side
/// effects are never rolled back, even when the budget runs out later.
#[derive(Clone)]
pub struct Agent {
    provider: Arc<dyn ModelProvider>,
    executor: ToolExecutor,
    options: AgentOptions,
}

impl Agent {
    pub fn new(provider: Arc<dyn ModelProvider>, executor: ToolExecutor, options: AgentOptions) -> Self {
        Self {
            provider,
            executor,
            options,
        }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub async fn run(&self, query: impl Into<String>) -> Result<AgentOutcome, AgentError> {
        let request_id = Uuid::new_v4();
        self.run_loop(query.into())
            .instrument(info_span!("agent", %request_id))
            .await
    }

    async fn run_loop(&self, query: String) -> Result<AgentOutcome, AgentError> {
        info!(chars = query.len(), "Agent run started");
        let ceiling = self.options.max_iterations;
        let mut request = ModelRequest {
            model: self.options.model.clone(),
            system: self.options.system_prompt.clone(),
            turns: vec![Turn::User(query)],
            functions: self.executor.catalog().schemas().to_vec(),
        };
        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut exchanges = 0;

        loop {
            debug!(exchange = exchanges + 1, turns = request.turns.len(), "Awaiting model response");
            let reply = self.generate(&request).await?;
            exchanges += 1;

            let call = match reply {
                ModelReply::Text(text) => {
                    info!(exchanges, tools = tool_calls.len(), "Agent returned final response");
                    return Ok(AgentOutcome {
                        outcome: TurnOutcome::Answer(text),
                        tool_calls,
                        exchanges,
                    });
                }
                ModelReply::FunctionCall(call) => call,
            };

            if tool_calls.len() >= ceiling {
                warn!(ceiling, tool = %call.name, "Agent exceeded max tool interactions");
                return Ok(AgentOutcome {
                    outcome: TurnOutcome::MaxIterationsReached { ceiling },
                    tool_calls,
                    exchanges,
                });
            }

            info!(tool = %call.name, "Agent requested tool execution");
            let (result, success) = match self.executor.execute(&call.name, call.args.clone()).await {
                Ok(text) => (text, true),
                Err(ExecutionError::Session { source, .. }) if source.is_fatal() => {
                    warn!(tool = %call.name, err = %source, "tool execution left the backend unusable");
                    return Err(AgentError::Backend(source));
                }
                Err(err) => {
                    warn!(tool = %call.name, %err, "tool execution failed; reporting to model");
                    (format!("Error: {}", err.user_message()), false)
                }
            };

            tool_calls.push(ToolCallRecord {
                tool: call.name.clone(),
                arguments: call.args.clone(),
                result: result.clone(),
                success,
            });
            let response = Turn::response_to(&call, result);
            request.turns.push(Turn::FunctionCall(call));
            request.turns.push(response);
        }
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        match self.options.model_timeout {
            Some(after) => tokio::time::timeout(after, self.provider.generate(request))
                .await
                .map_err(|_| ModelError::timeout(self.provider.id(), after))?,
            None => self.provider.generate(request).await,
        }
    }
}
