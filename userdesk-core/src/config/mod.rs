pub mod agent;
pub mod app;
pub mod error;
pub mod loader;
pub mod provider;
pub mod rest;
pub mod roots;
pub mod server;

pub use crate::constants::CONFIG_PATH;

pub use agent::AgentConfig;
pub use app::AppConfig;
pub use error::ConfigError;
pub use provider::ModelProviderConfig;
pub use rest::RestConfig;
pub use roots::RootsConfig;
pub use server::ServerConfig;
