use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// How to launch the backend server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawServer {
    #[serde(default = "default_server_name")]
    name: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
    workdir: Option<String>,
}

fn default_server_name() -> String {
    "userdesk".to_string()
}

pub(crate) fn expand(s: &str) -> String {
    shellexpand::full(s)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

impl RawServer {
    /// Expands `${VAR}` and `~` in command, args, env values and workdir.
    ///
    /// Returns `None` when no command was configured.
    pub(crate) fn into_config(self) -> Option<ServerConfig> {
        let command = self.command.filter(|c| !c.trim().is_empty())?;

        Some(ServerConfig {
            name: self.name,
            command: PathBuf::from(expand(&command)),
            args: self.args.iter().map(|arg| expand(arg)).collect(),
            env: self
                .env
                .into_iter()
                .map(|(key, value)| (key, expand(&value)))
                .collect(),
            workdir: self.workdir.map(|d| PathBuf::from(expand(&d))),
        })
    }
}
