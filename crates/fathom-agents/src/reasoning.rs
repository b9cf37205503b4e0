//! Reasoning-model calls shared by every stage: stage marker, call policy,
//! deadline clipping and token accounting.

use std::sync::Arc;

use fathom_core::errors::ProviderError;
use fathom_core::json::parse_json;
use fathom_core::models::{Stage, StageUsage};
use fathom_core::resilience::{call_with_retry, CallPolicy, RunDeadline};
use fathom_core::traits::IReasoningModel;
use fathom_tokens::TokenCounter;
use serde::de::DeserializeOwned;

/// Result of one logical model call (all attempts) plus its cost.
#[derive(Debug)]
pub struct ModelReply<T> {
    pub result: Result<T, ProviderError>,
    pub usage: StageUsage,
}

/// Cheap to clone; shared by all stages of all runs.
#[derive(Clone)]
pub struct ReasoningClient {
    model: Arc<dyn IReasoningModel>,
    policy: CallPolicy,
    tokens: TokenCounter,
}

impl ReasoningClient {
    pub fn new(model: Arc<dyn IReasoningModel>, policy: CallPolicy, tokens: TokenCounter) -> Self {
        Self {
            model,
            policy,
            tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Send `body` tagged with the stage marker. Transient failures are
    /// retried per the call policy; every attempt counts as a model call.
    pub async fn complete(
        &self,
        stage: Stage,
        body: &str,
        temperature: f64,
        deadline: RunDeadline,
    ) -> ModelReply<String> {
        let prompt = format!("{}\n{}", stage.marker(), body);
        let attempted = call_with_retry(self.policy, deadline, stage.as_str(), || {
            self.model.complete(&prompt, temperature)
        })
        .await;

        let exchange = self
            .tokens
            .usage(&prompt, attempted.result.as_deref().unwrap_or_default());
        let mut usage = StageUsage {
            model_calls: attempted.attempts,
            prompt_tokens: exchange.prompt_tokens * attempted.attempts as usize,
            completion_tokens: exchange.completion_tokens,
            ..Default::default()
        };
        if let Err(e) = &attempted.result {
            usage.failed_calls = 1;
            tracing::debug!(stage = %stage, error = %e, "model call failed");
        }
        ModelReply {
            result: attempted.result,
            usage,
        }
    }

    /// Like `complete`, then parse the reply as JSON into `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        stage: Stage,
        body: &str,
        temperature: f64,
        deadline: RunDeadline,
    ) -> ModelReply<T> {
        let reply = self.complete(stage, body, temperature, deadline).await;
        ModelReply {
            result: reply
                .result
                .and_then(|text| parse_json::<T>(stage.as_str(), &text)),
            usage: reply.usage,
        }
    }
}

impl std::fmt::Debug for ReasoningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningClient")
            .field("model", &self.model.name())
            .field("policy", &self.policy)
            .finish()
    }
}
