use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::resilience::CallPolicy;

/// Retriever fan-out and re-rank sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result limit for each (sub-query, mode) search call.
    pub per_query_limit: usize,
    /// Maximum index calls in flight for one run.
    pub fanout_concurrency: usize,
    /// Timeout for a single index call (milliseconds).
    pub index_timeout_ms: u64,
    /// Retries after the first failed index call.
    pub index_retries: u32,
    /// Initial backoff between retries (milliseconds). Doubles per attempt.
    pub retry_backoff_ms: u64,
    /// Candidates kept for re-ranking; the lowest fused scores are dropped first.
    pub rerank_pool_size: usize,
    /// Size of the evidence set handed to synthesis.
    pub top_k: usize,
    /// Characters of each candidate shown to the re-ranker.
    pub snippet_chars: usize,
}

impl RetrievalConfig {
    /// Call policy for index provider requests.
    pub fn index_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_millis(self.index_timeout_ms),
            retries: self.index_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            per_query_limit: defaults::DEFAULT_PER_QUERY_LIMIT,
            fanout_concurrency: defaults::DEFAULT_FANOUT_CONCURRENCY,
            index_timeout_ms: defaults::DEFAULT_INDEX_TIMEOUT_MS,
            index_retries: defaults::DEFAULT_INDEX_RETRIES,
            retry_backoff_ms: defaults::DEFAULT_RETRY_BACKOFF_MS,
            rerank_pool_size: defaults::DEFAULT_RERANK_POOL_SIZE,
            top_k: defaults::DEFAULT_TOP_K,
            snippet_chars: defaults::DEFAULT_SNIPPET_CHARS,
        }
    }
}
