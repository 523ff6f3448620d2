//! Client for the public randomuser.me generator.

use crate::store::NewUser;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://randomuser.me/api/";

#[derive(Debug, Error)]
pub enum RandomUserError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct RandomUserClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RandomUserClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self) -> Result<NewUser, RandomUserError> {
        debug!(endpoint = %self.endpoint, "Fetching random user");
        let payload: ApiResponse = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        payload
            .results
            .into_iter()
            .next()
            .map(ApiUser::into_new_user)
            .ok_or_else(|| RandomUserError::Malformed("empty results".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    results: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    name: ApiName,
    email: String,
    location: ApiLocation,
    phone: String,
}

#[derive(Debug, Deserialize)]
struct ApiName {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    street: ApiStreet,
    city: String,
    state: String,
    country: String,
    postcode: Value,
}

#[derive(Debug, Deserialize)]
struct ApiStreet {
    number: Value,
    name: String,
}

/// Postcodes and street numbers arrive as either numbers or strings.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ApiUser {
    fn into_new_user(self) -> NewUser {
        let loc = self.location;
        NewUser {
            name: format!("{} {}", self.name.first, self.name.last),
            email: self.email,
            address: format!(
                "{} {}, {}, {}, {} {}",
                scalar(&loc.street.number),
                loc.street.name,
                loc.city,
                loc.state,
                loc.country,
                scalar(&loc.postcode)
            ),
            phone: self.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_api_payload_onto_a_user_record() {
        let payload: ApiResponse = serde_json::from_value(json!({
            "results": [{
                "name": { "title": "Ms", "first": "Jo", "last": "Doe" },
                "email": "jo.doe@example.com",
                "location": {
                    "street": { "number": 4121, "name": "Elm St" },
                    "city": "Leeds",
                    "state": "West Yorkshire",
                    "country": "United Kingdom",
                    "postcode": "LS1 4AP"
                },
                "phone": "017687 12345"
            }],
            "info": { "seed": "abc" }
        }))
        .expect("payload decodes");

        let user = payload.results.into_iter().next().expect("one").into_new_user();

        assert_eq!(user.name, "Jo Doe");
        assert_eq!(user.email, "jo.doe@example.com");
        assert_eq!(user.address, "4121 Elm St, Leeds, West Yorkshire, United Kingdom LS1 4AP");
        assert_eq!(user.phone, "017687 12345");
    }

    #[test]
    fn numeric_postcodes_are_rendered_plainly() {
        assert_eq!(scalar(&json!(90210)), "90210");
        assert_eq!(scalar(&json!("K1A 0B1")), "K1A 0B1");
    }
}
