//! Application constants
//!
//! Single source of truth for paths, protocol identifiers and defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/client.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Protocol revision negotiated during the handshake
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Default OpenAI-compatible chat completions path
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

/// Tool executions allowed per request before the loop gives up
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Deadline for a single backend request unless `[agent] request_timeout_secs` says otherwise
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Text reported when the loop stops on its iteration ceiling
pub const MAX_ITERATIONS_REACHED: &str = "Maximum iterations reached";

/// Default REST gateway bind address
pub const DEFAULT_REST_BIND: &str = "0.0.0.0:8000";

/// Name advertised for the data directory root
pub const DEFAULT_ROOT_NAME: &str = "User Data Directory";

/// Resource listing every stored user
pub const USERS_ALL_URI: &str = "users://all";
