use crate::config::ServerSettings;
use crate::errors::RequestError;
use crate::protocol::{INVALID_REQUEST, Incoming, PARSE_ERROR, failure, success};
use crate::randomuser::RandomUserClient;
use crate::resources::ResourceSpace;
use crate::store::UserStore;
use crate::{prompts, tools};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};
use userdesk_core::constants::PROTOCOL_VERSION;
use userdesk_core::types::{Arguments, ListPromptsResult, ListResourcesResult, ListToolsResult};

pub const SERVER_NAME: &str = "userdesk-server";

/// Dispatches decoded JSON-RPC messages to the user-record operations.
#[derive(Clone)]
pub struct UserDeskService {
    store: Arc<UserStore>,
    random: RandomUserClient,
    resources: ResourceSpace,
}

#[derive(Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Arguments,
}

#[derive(Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Arguments,
}

impl UserDeskService {
    pub fn new(settings: &ServerSettings) -> Self {
        Self {
            store: Arc::new(UserStore::new(settings.users_file())),
            random: RandomUserClient::new(settings.random_user_endpoint.clone()),
            resources: ResourceSpace::new(&settings.data_dir),
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Handles one raw line; `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        match Incoming::parse(line) {
            Ok(message) => self.handle(message).await,
            Err(err) => {
                debug!(%err, "Unparseable line");
                Some(failure(Value::Null, PARSE_ERROR, "Parse error"))
            }
        }
    }

    pub async fn handle(&self, message: Incoming) -> Option<Value> {
        match message {
            Incoming::Request { id, method, params } => {
                let reply = match self.dispatch(&method, params).await {
                    Ok(result) => success(id, result),
                    Err(err) => {
                        debug!(%method, code = err.code(), %err, "Request failed");
                        failure(id, err.code(), err.to_string())
                    }
                };
                Some(reply)
            }
            Incoming::Notification { method } => {
                debug!(%method, "Notification received");
                None
            }
            Incoming::Response { id } => {
                debug!(%id, "Ignoring unsolicited response");
                None
            }
            Incoming::Invalid { id } => Some(failure(id, INVALID_REQUEST, "Invalid Request")),
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RequestError> {
        match method {
            "initialize" => Ok(self.initialize(params)),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(ListToolsResult {
                tools: tools::descriptors(),
            }),
            "tools/call" => {
                let CallToolParams { name, arguments } = decode(params)?;
                info!(tool = %name, "Calling tool");
                let result = tools::call(&self.store, &self.random, &name, &arguments).await?;
                to_value(result)
            }
            "resources/list" => to_value(ListResourcesResult {
                resources: self.resources.descriptors(),
            }),
            "resources/read" => {
                let ReadResourceParams { uri } = decode(params)?;
                to_value(self.resources.read(&self.store, &uri).await?)
            }
            "prompts/list" => to_value(ListPromptsResult {
                prompts: prompts::descriptors(),
            }),
            "prompts/get" => {
                let GetPromptParams { name, arguments } = decode(params)?;
                to_value(prompts::get(&name, &arguments)?)
            }
            other => {
                warn!(method = %other, "Unsupported method");
                Err(RequestError::MethodNotFound(other.to_string()))
            }
        }
    }

    fn initialize(&self, params: Value) -> Value {
        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(%client, "Initializing session");
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
        })
    }
}

fn decode<T: DeserializeOwned>(params: Value) -> Result<T, RequestError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|err| RequestError::InvalidParams(err.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, RequestError> {
    serde_json::to_value(value).map_err(|err| RequestError::Internal(err.to_string()))
}
