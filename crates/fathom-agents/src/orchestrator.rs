//! Intent orchestrator: DIRECT vs RESEARCH routing with a per-question cache.

use fathom_core::config::AgentConfig;
use fathom_core::errors::ProviderError;
use fathom_core::models::{
    Answer, Classification, Complexity, DegradationEvent, QueryCategory, Question, Route, Stage,
    StageOutput, StageUsage,
};
use fathom_core::resilience::RunDeadline;
use moka::sync::Cache;
use serde::Deserialize;

use crate::prompts;
use crate::reasoning::ReasoningClient;

#[derive(Debug, Deserialize)]
struct ClassificationReply {
    route: String,
    #[serde(default)]
    complexity: Option<String>,
    #[serde(default, alias = "type")]
    category: Option<String>,
}

impl ClassificationReply {
    fn into_classification(self) -> Result<Classification, ProviderError> {
        let route = match self.route.trim().to_ascii_uppercase().as_str() {
            "DIRECT" => Route::Direct,
            "RESEARCH" => Route::Research,
            other => {
                return Err(ProviderError::malformed(
                    Stage::Routing.as_str(),
                    format!("unknown route {other:?}"),
                ))
            }
        };
        let complexity = match self.complexity.as_deref().map(str::trim) {
            Some(c) if c.eq_ignore_ascii_case("simple") => Complexity::Simple,
            _ => Complexity::Complex,
        };
        let category = match self
            .category
            .as_deref()
            .map(|c| c.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("financial") => QueryCategory::Financial,
            Some("risk") => QueryCategory::Risk,
            Some("market") => QueryCategory::Market,
            _ => QueryCategory::General,
        };
        Ok(Classification {
            route,
            complexity,
            category,
            degraded: false,
        })
    }
}

/// Classifies questions and answers DIRECT ones.
///
/// The cache is shared across concurrent runs; identical normalized
/// questions always get the routing decided the first time.
pub struct IntentOrchestrator {
    client: ReasoningClient,
    classify_temperature: f64,
    direct_temperature: f64,
    cache: Cache<String, Classification>,
}

impl IntentOrchestrator {
    pub fn new(client: ReasoningClient, config: &AgentConfig) -> Self {
        Self {
            client,
            classify_temperature: config.temperatures.orchestrator,
            direct_temperature: config.temperatures.direct,
            cache: Cache::new(config.classification_cache_capacity),
        }
    }

    /// Route `question`. Never fails: provider errors and unparseable
    /// output fall back to RESEARCH / COMPLEX.
    pub async fn classify(
        &self,
        question: &Question,
        deadline: RunDeadline,
    ) -> StageOutput<Classification> {
        let key = question.normalized();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(route = ?cached.route, "classification cache hit");
            return StageOutput::new(cached, StageUsage::default());
        }

        let body = prompts::classify(question);
        let reply = self
            .client
            .complete_json::<ClassificationReply>(
                Stage::Routing,
                &body,
                self.classify_temperature,
                deadline,
            )
            .await;

        let parsed = reply.result.and_then(ClassificationReply::into_classification);
        let output = match parsed {
            Ok(classification) => StageOutput::new(classification, reply.usage),
            Err(e) => StageOutput::new(Classification::fallback(), reply.usage).degraded(
                DegradationEvent::new(Stage::Routing, e.to_string(), "research route"),
            ),
        };
        // Fallbacks are cached too so a question never flips routes.
        self.cache.insert(key, output.value);
        tracing::info!(
            route = ?output.value.route,
            complexity = ?output.value.complexity,
            category = output.value.category.as_str(),
            degraded = output.value.degraded,
            "question classified"
        );
        output
    }

    /// Short uncited answer for a DIRECT question. `None` means the caller
    /// should take the research path instead.
    pub async fn answer_directly(
        &self,
        question: &Question,
        deadline: RunDeadline,
    ) -> StageOutput<Option<Answer>> {
        let body = prompts::direct_answer(question);
        let reply = self
            .client
            .complete(Stage::Direct, &body, self.direct_temperature, deadline)
            .await;
        match reply.result {
            Ok(text) if !text.trim().is_empty() => {
                StageOutput::new(Some(Answer::direct(text.trim())), reply.usage)
            }
            Ok(_) => StageOutput::new(None, reply.usage).degraded(DegradationEvent::new(
                Stage::Direct,
                "empty direct answer",
                "research path",
            )),
            Err(e) => StageOutput::new(None, reply.usage).degraded(DegradationEvent::new(
                Stage::Direct,
                e.to_string(),
                "research path",
            )),
        }
    }

    /// Entries currently cached.
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
