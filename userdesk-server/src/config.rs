use crate::randomuser::DEFAULT_ENDPOINT;
use std::path::PathBuf;

pub const USERS_FILE: &str = "users.json";

/// Runtime settings for the user-record server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub data_dir: PathBuf,
    pub random_user_endpoint: String,
}

impl ServerSettings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            random_user_endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_random_user_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.random_user_endpoint = endpoint.into();
        self
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self::new("data")
    }
}
