//! Remote index service: `POST {base}/search` with a bearer key.

use std::time::Duration;

use async_trait::async_trait;
use fathom_core::errors::{ConfigError, ProviderError};
use fathom_core::models::{SearchHit, SearchMode};
use fathom_core::traits::IIndexProvider;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    mode: SearchMode,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

pub struct HttpIndexProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HttpIndexProvider {
    /// Both the endpoint and the key are required up front.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "providers.index_base_url".to_string(),
            });
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "index api key".to_string(),
            });
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("fathom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::ValidationFailed {
                field: "providers.index_base_url".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: format!("{base_url}/search"),
            api_key: api_key.trim().to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, mode: SearchMode, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                operation: format!("{} search", mode.as_str()),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ProviderError::Unavailable {
                provider: self.endpoint.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl IIndexProvider for HttpIndexProvider {
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&SearchRequest { query, mode, limit })
            .send()
            .await
            .map_err(|e| self.map_error(mode, e))?
            .error_for_status()
            .map_err(|e| self.map_error(mode, e))?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("index", e.to_string()))?;
        let mut hits = parsed.hits;
        hits.truncate(limit);
        Ok(hits)
    }

    fn name(&self) -> &str {
        "http-index"
    }
}
