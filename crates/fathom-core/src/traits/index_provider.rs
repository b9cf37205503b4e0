use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{SearchHit, SearchMode};

/// Vector/keyword document index.
#[async_trait]
pub trait IIndexProvider: Send + Sync {
    /// Search the index. Read-only and idempotent; may return fewer than `limit` hits.
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
