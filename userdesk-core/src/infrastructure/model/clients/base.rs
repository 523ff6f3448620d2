//! HTTP plumbing shared by the provider clients.

use crate::infrastructure::model::types::ModelError;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// How a provider expects its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// `Authorization: Bearer`, skipped when no key is configured.
    OptionalBearer,
    /// `?key=` query parameter, required.
    QueryParam,
}

#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            id,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http: Client::new(),
        }
    }

    /// Joins `path` onto the endpoint with exactly one slash between them.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        body: &Req,
        placement: KeyPlacement,
    ) -> Result<Res, ModelError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let request = self.authorize(self.http.post(url).json(body), placement)?;
        let network = |source| ModelError::network(&self.id, source);

        request
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)
    }

    fn authorize(
        &self,
        request: RequestBuilder,
        placement: KeyPlacement,
    ) -> Result<RequestBuilder, ModelError> {
        match (placement, self.api_key.as_deref()) {
            (KeyPlacement::OptionalBearer, Some(key)) => Ok(request.bearer_auth(key)),
            (KeyPlacement::OptionalBearer, None) => Ok(request),
            (KeyPlacement::QueryParam, Some(key)) => Ok(request.query(&[("key", key)])),
            (KeyPlacement::QueryParam, None) => Err(ModelError::missing_api_key(&self.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_collapses_slashes() {
        let base = HttpClientBase::new("local".into(), "http://127.0.0.1:11434/".into(), None);
        assert_eq!(
            base.build_url("/v1/chat/completions"),
            "http://127.0.0.1:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn query_key_is_required() {
        let base = HttpClientBase::new("gemini".into(), "http://127.0.0.1:9".into(), Some("  ".into()));
        let err = base
            .post_json::<_, serde_json::Value>("http://127.0.0.1:9/x", &serde_json::json!({}), KeyPlacement::QueryParam)
            .await
            .expect_err("blank key is missing");
        assert!(matches!(err, ModelError::MissingApiKey { .. }));
    }
}
