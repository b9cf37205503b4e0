use std::sync::Arc;

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

/// Prompt and completion token counts for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
/// Caches results per blake3 content hash. Cheap to clone.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Option<Arc<CoreBPE>>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    /// Create a new TokenCounter with the given cache capacity.
    pub fn new(cache_capacity: u64) -> Self {
        let bpe = match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(Arc::new(bpe)),
            Err(e) => {
                tracing::warn!(error = %e, "cl100k_base unavailable, counting whitespace-separated words");
                None
            }
        };
        Self {
            bpe,
            cache: Cache::new(cache_capacity),
        }
    }

    /// Whether exact BPE counting is active.
    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }

    /// Count tokens in the given text (uncached).
    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => text.split_whitespace().count(),
        }
    }

    /// Count tokens with blake3 content-hash caching.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }

    /// Usage for one prompt/completion exchange. Prompts are cached since
    /// stages resend identical prompts on retry.
    pub fn usage(&self, prompt: &str, completion: &str) -> TokenUsage {
        TokenUsage {
            prompt_tokens: self.count_cached(prompt),
            completion_tokens: self.count(completion),
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("exact", &self.is_exact())
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_tokens() {
        assert_eq!(TokenCounter::default().count(""), 0);
    }

    #[test]
    fn usage_counts_both_sides() {
        let counter = TokenCounter::default();
        let usage = counter.usage("What was Q4 revenue?", "");
        assert!(usage.prompt_tokens > 0);
        assert_eq!(usage.completion_tokens, 0);
    }
}
