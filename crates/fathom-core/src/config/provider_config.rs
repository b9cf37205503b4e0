use serde::{Deserialize, Serialize};

use super::defaults;

/// Endpoints of the external reasoning model and index provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Ollama-compatible chat endpoint.
    pub model_base_url: String,
    /// Model name sent with every chat request.
    pub model_name: String,
    /// Base URL of the remote index service. `None` selects a local corpus.
    pub index_base_url: Option<String>,
    /// Environment variable holding the index API key.
    pub index_api_key_env: String,
    /// Path of a JSON corpus for the in-memory index.
    pub corpus_path: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model_base_url: defaults::DEFAULT_MODEL_BASE_URL.to_string(),
            model_name: defaults::DEFAULT_MODEL_NAME.to_string(),
            index_base_url: None,
            index_api_key_env: defaults::DEFAULT_INDEX_API_KEY_ENV.to_string(),
            corpus_path: None,
        }
    }
}
