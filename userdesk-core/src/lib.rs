//! # userdesk-core
//!
//! Client-side building blocks for driving a tool/resource/prompt server
//! through a function-calling language model.
//!
//! - [`domain`] - wire types shared with the server and the conversation model
//! - [`application`] - backend session, tool catalog, executor and the agent loop
//! - [`infrastructure`] - model API clients and the REST gateway
//! - [`config`] - `client.toml` loading and validation

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use application::{agent, catalog, session, tooling};
pub use config::AppConfig;
pub use domain::types;
pub use infrastructure::{model, server};
