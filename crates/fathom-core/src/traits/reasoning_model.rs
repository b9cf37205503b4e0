use async_trait::async_trait;

use crate::errors::ProviderError;

/// Language-model inference: prompt in, text out.
#[async_trait]
pub trait IReasoningModel: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f64) -> Result<String, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
