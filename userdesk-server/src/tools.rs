use crate::errors::RequestError;
use crate::randomuser::RandomUserClient;
use crate::store::{NewUser, UserStore};
use serde_json::{Value, json};
use tracing::{info, warn};
use userdesk_core::types::{Arguments, ToolDescriptor, ToolResult};

pub const CREATE_USER: &str = "create-user";
pub const CREATE_RANDOM_USER: &str = "create-random-user";

pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            CREATE_USER,
            "Create a new user in the database",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "email": { "type": "string" },
                    "address": { "type": "string" },
                    "phone": { "type": "string" }
                },
                "required": ["name", "email", "address", "phone"]
            }),
        ),
        ToolDescriptor::new(
            CREATE_RANDOM_USER,
            "Create a random user with fake data",
            json!({ "type": "object", "properties": {} }),
        ),
    ]
}

/// Runs a tool. Domain failures come back as `isError` results; only an
/// unknown name is a protocol error.
pub async fn call(
    store: &UserStore,
    random: &RandomUserClient,
    name: &str,
    args: &Arguments,
) -> Result<ToolResult, RequestError> {
    match name {
        CREATE_USER => Ok(create_user(store, args).await),
        CREATE_RANDOM_USER => Ok(create_random_user(store, random).await),
        other => {
            warn!(tool = %other, "Rejecting call to unknown tool");
            Err(RequestError::UnknownTool(other.to_string()))
        }
    }
}

async fn create_user(store: &UserStore, args: &Arguments) -> ToolResult {
    let user = match new_user_from(args) {
        Ok(user) => user,
        Err(reason) => return ToolResult::failure(format!("Failed to save user: {reason}")),
    };
    match store.create(user).await {
        Ok(user) => ToolResult::success(format!("User {} created successfully", user.id)),
        Err(err) => ToolResult::failure(format!("Failed to save user: {err}")),
    }
}

async fn create_random_user(store: &UserStore, random: &RandomUserClient) -> ToolResult {
    let fake = match random.fetch().await {
        Ok(fake) => fake,
        Err(err) => {
            warn!(%err, "Random user API failed");
            return ToolResult::failure(format!("Failed to fetch random user from API: {err}"));
        }
    };
    match store.create(fake).await {
        Ok(user) => {
            info!(id = user.id, "Created random user");
            ToolResult::success(format!(
                "User {} created successfully: {} ({})",
                user.id, user.name, user.email
            ))
        }
        Err(err) => ToolResult::failure(format!("Failed to create user: {err}")),
    }
}

fn new_user_from(args: &Arguments) -> Result<NewUser, String> {
    let field = |key: &str| match args.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(format!("argument '{key}' must be a string")),
        None => Err(format!("missing required argument '{key}'")),
    };
    Ok(NewUser {
        name: field("name")?,
        email: field("email")?,
        address: field("address")?,
        phone: field("phone")?,
    })
}
