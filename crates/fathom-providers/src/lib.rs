//! # fathom-providers
//!
//! Concrete implementations of the two provider seams:
//! - [`OllamaModel`]: an Ollama-compatible `/api/chat` reasoning model.
//! - [`HttpIndexProvider`]: a remote search service behind a bearer key.
//! - [`InMemoryIndex`]: a JSON corpus scored with BM25 (keyword) and
//!   term-frequency cosine (semantic), for local runs and tests.

pub mod http_index;
pub mod memory;
pub mod ollama;

pub use http_index::HttpIndexProvider;
pub use memory::{Corpus, CorpusDocument, InMemoryIndex};
pub use ollama::OllamaModel;

use std::sync::Arc;
use std::time::Duration;

use fathom_core::config::FathomConfig;
use fathom_core::errors::ConfigError;
use fathom_core::traits::{IIndexProvider, IReasoningModel};

/// Index selected by the config: the remote service when `index_base_url`
/// is set, otherwise the corpus at `corpus_path`.
pub fn index_from_config(config: &FathomConfig) -> Result<Arc<dyn IIndexProvider>, ConfigError> {
    let providers = &config.providers;
    if let Some(base_url) = &providers.index_base_url {
        let key = std::env::var(&providers.index_api_key_env).map_err(|_| {
            ConfigError::MissingCredential {
                name: providers.index_api_key_env.clone(),
            }
        })?;
        let timeout = Duration::from_millis(config.retrieval.index_timeout_ms);
        return Ok(Arc::new(HttpIndexProvider::new(base_url, &key, timeout)?));
    }
    match &providers.corpus_path {
        Some(path) => Ok(Arc::new(InMemoryIndex::from_path(path)?)),
        None => Err(ConfigError::MissingCredential {
            name: "providers.index_base_url or providers.corpus_path".to_string(),
        }),
    }
}

/// Reasoning model selected by the config.
pub fn model_from_config(config: &FathomConfig) -> Result<Arc<dyn IReasoningModel>, ConfigError> {
    let timeout = Duration::from_millis(config.agents.model_timeout_ms);
    Ok(Arc::new(OllamaModel::new(
        &config.providers.model_base_url,
        &config.providers.model_name,
        timeout,
    )?))
}
