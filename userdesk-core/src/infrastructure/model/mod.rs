//! Model infrastructure module
//!
//! # Structure
//! - `types` - Request, Reply, Error types
//! - `traits` - ModelProvider trait
//! - `factory` - Provider factory for creating clients
//! - `clients` - Gemini and OpenAI-compatible wire encoders

pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::ProviderFactory;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelReply, ModelRequest};
