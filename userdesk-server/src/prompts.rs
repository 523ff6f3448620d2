use crate::errors::RequestError;
use serde_json::Value;
use userdesk_core::types::{
    Arguments, ContentBlock, GetPromptResult, PromptArgument, PromptDescriptor, PromptMessage, Role,
};

pub const GENERATE_FAKE_USER: &str = "generate-fake-user";

pub fn descriptors() -> Vec<PromptDescriptor> {
    vec![PromptDescriptor {
        name: GENERATE_FAKE_USER.to_string(),
        description: Some("Generate a fake user based on a given name".to_string()),
        arguments: vec![PromptArgument {
            name: "name".to_string(),
            description: Some("Name for the fake user".to_string()),
            required: true,
        }],
    }]
}

pub fn get(name: &str, args: &Arguments) -> Result<GetPromptResult, RequestError> {
    if name != GENERATE_FAKE_USER {
        return Err(RequestError::UnknownPrompt(name.to_string()));
    }
    let user_name = match args.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(RequestError::InvalidParams(
                "missing required argument 'name'".to_string(),
            ));
        }
    };
    Ok(GetPromptResult {
        description: None,
        messages: vec![PromptMessage {
            role: Role::User,
            content: ContentBlock::text(format!(
                "Generate a fake user with the name {user_name}. The user should have a realistic email, address, and phone number."
            )),
        }],
    })
}
