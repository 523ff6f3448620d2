//! # Agent Module
//!
//! Tool-calling orchestration over a function-calling model.
//!
//! ## Key Types
//!
//! - [`Agent`] - drives one request through the model/tool loop
//! - [`ToolExecutor`] - invokes catalog tools on the backend session
//! - [`AgentOptions`] - model, system prompt, iteration ceiling, timeouts
//! - [`AgentOutcome`] - final [`TurnOutcome`] plus the tool-call log
//!
//! ## Agent Loop
//!
//! 1. Send the conversation and function schemas to the model
//! 2. If the model replies with text, that is the answer
//! 3. If it requests a function call, execute it (failures become
//!    `"Error: ..."` result text), append call and result, and go to 1
//! 4. Once `max_iterations` tools have run, a further call request ends the
//!    request with [`TurnOutcome::MaxIterationsReached`]

mod errors;
mod executor;
mod models;
mod runner;


pub use errors::{AgentError, ExecutionError};
pub use executor::ToolExecutor;
pub use models::{AgentOptions, AgentOutcome, ToolCallRecord, TurnOutcome};
pub use runner::Agent;
