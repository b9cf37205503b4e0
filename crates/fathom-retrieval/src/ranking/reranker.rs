//! Listwise re-ranking by the reasoning model.
//!
//! The bounded pool goes to one temperature-0 call with numbered snippets.
//! Any failure falls back to fused order and is recorded as a degradation.

use fathom_agents::reasoning::ReasoningClient;
use fathom_core::config::RetrievalConfig;
use fathom_core::models::{
    Candidate, DegradationEvent, EvidenceSet, Question, Stage, StageOutput, StageUsage,
};
use fathom_core::resilience::RunDeadline;
use serde::Deserialize;

use super::pool::{apply_ranking, bound_pool};

#[derive(Debug, Deserialize)]
struct RankedIndices {
    ranked_indices: Vec<i64>,
}

pub struct Reranker {
    client: ReasoningClient,
    temperature: f64,
    pool_size: usize,
    top_k: usize,
    snippet_chars: usize,
}

impl Reranker {
    pub fn new(client: ReasoningClient, config: &RetrievalConfig, temperature: f64) -> Self {
        Self {
            client,
            temperature,
            pool_size: config.rerank_pool_size,
            top_k: config.top_k,
            snippet_chars: config.snippet_chars,
        }
    }

    /// Reorder `candidates` by relevance to `question` and keep the top K.
    pub async fn rerank(
        &self,
        question: &Question,
        candidates: Vec<Candidate>,
        deadline: RunDeadline,
    ) -> StageOutput<EvidenceSet> {
        let pool = bound_pool(candidates, self.pool_size);
        if pool.len() <= 1 {
            return StageOutput::new(EvidenceSet::new(pool), StageUsage::default());
        }

        let prompt = self.prompt(question, &pool);
        let reply = self
            .client
            .complete_json::<RankedIndices>(Stage::Reranking, &prompt, self.temperature, deadline)
            .await;

        let failure = match reply.result {
            Ok(ranked) => {
                let (ordered, valid) = apply_ranking(&pool, &ranked.ranked_indices, self.top_k);
                if valid > 0 {
                    return StageOutput::new(EvidenceSet::new(ordered), reply.usage);
                }
                "no valid indices in ranking".to_string()
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(pool = pool.len(), reason = %failure, "re-rank fell back to fused order");
        let mut fallback = pool;
        fallback.truncate(self.top_k);
        StageOutput::new(EvidenceSet::new(fallback), reply.usage).degraded(DegradationEvent::new(
            Stage::Reranking,
            failure,
            "fused-score order",
        ))
    }

    fn prompt(&self, question: &Question, pool: &[Candidate]) -> String {
        let mut snippets = String::new();
        for (i, c) in pool.iter().enumerate() {
            let snippet: String = c
                .text
                .chars()
                .take(self.snippet_chars)
                .map(|ch| if ch == '\n' { ' ' } else { ch })
                .collect();
            snippets.push_str(&format!("[{i}] {snippet}\n\n"));
        }
        format!(
            "You are a relevance ranking engine for financial research.\n\
             Query: \"{query}\"\n\n\
             Rank the snippets below by relevance to the query.\n\
             - High relevance: directly answers the query or contains key financial data.\n\
             - Low relevance: tangential or unrelated.\n\n\
             Snippets:\n{snippets}\
             Return JSON only, listing snippet indices from most to least relevant.\n\
             Example: {{\"ranked_indices\": [3, 0, 1]}}",
            query = question.text(),
        )
    }
}
