mod handlers;
mod process;

pub use handlers::{ClientHandlers, HandlerError};
pub use process::McpSession;
