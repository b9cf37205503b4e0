//! CandidateRetriever: every sub-query × mode fans out under a concurrency cap.

mod normalize;
mod report;

pub use normalize::normalize_scores;
pub use report::{CallReport, CallStatus, RetrievalReport};

use std::sync::Arc;

use fathom_core::config::RetrievalConfig;
use fathom_core::models::{
    DegradationEvent, SearchHit, SearchMode, Stage, StageOutput, StageUsage, SubQuery,
};
use fathom_core::resilience::{call_with_retry, RunDeadline};
use fathom_core::traits::IIndexProvider;
use futures::stream::{self, StreamExt};

/// A hit tagged with the method that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedHit {
    pub mode: SearchMode,
    pub hit: SearchHit,
}

/// All hits of one round plus the per-call report.
#[derive(Debug, Clone, Default)]
pub struct RetrievalRound {
    pub hits: Vec<TaggedHit>,
    pub report: RetrievalReport,
}

/// Issues semantic and keyword searches for every sub-query in parallel.
pub struct CandidateRetriever {
    index: Arc<dyn IIndexProvider>,
    config: RetrievalConfig,
}

impl CandidateRetriever {
    pub fn new(index: Arc<dyn IIndexProvider>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    /// Run the round's fan-out and join. Failed or timed-out calls
    /// contribute no hits and never block the others.
    pub async fn retrieve(
        &self,
        sub_queries: &[SubQuery],
        deadline: RunDeadline,
    ) -> StageOutput<RetrievalRound> {
        let calls: Vec<(usize, &SubQuery, SearchMode)> = sub_queries
            .iter()
            .flat_map(|q| SearchMode::ALL.into_iter().map(move |m| (q, m)))
            .enumerate()
            .map(|(slot, (q, m))| (slot, q, m))
            .collect();

        let pending: Vec<_> = calls
            .into_iter()
            .map(|(slot, query, mode)| async move {
                let (report, hits) = self.search_one(query, mode, deadline).await;
                (slot, report, hits)
            })
            .collect();
        let mut finished: Vec<(usize, CallReport, Vec<SearchHit>)> = stream::iter(pending)
            .buffer_unordered(self.config.fanout_concurrency.max(1))
            .collect()
            .await;
        // Join order is arbitrary; restore call order so fusion input is stable.
        finished.sort_by_key(|(slot, _, _)| *slot);

        let mut round = RetrievalRound::default();
        let mut usage = StageUsage::default();
        for (_, report, hits) in finished {
            usage.index_calls += report.attempts;
            if !report.status.is_ok() {
                usage.failed_calls += 1;
            }
            let mode = report.mode;
            round
                .hits
                .extend(hits.into_iter().map(|hit| TaggedHit { mode, hit }));
            round.report.calls.push(report);
        }

        tracing::debug!(
            sub_queries = sub_queries.len(),
            calls = round.report.calls.len(),
            failures = round.report.failures(),
            timeouts = round.report.timeouts(),
            hits = round.hits.len(),
            "retrieval round joined"
        );

        let failed = round.report.failures() + round.report.timeouts();
        let total = round.report.calls.len();
        let mut output = StageOutput::new(round, usage);
        if failed > 0 {
            let fallback = if failed == total {
                "empty candidate set"
            } else {
                "partial results from remaining calls"
            };
            output = output.degraded(DegradationEvent::new(
                Stage::Retrieving,
                format!("{failed} of {total} index calls failed"),
                fallback,
            ));
        }
        output
    }

    async fn search_one(
        &self,
        query: &SubQuery,
        mode: SearchMode,
        deadline: RunDeadline,
    ) -> (CallReport, Vec<SearchHit>) {
        let policy = self.config.index_policy();
        let limit = self.config.per_query_limit;
        let operation = format!("{} search", mode.as_str());
        let attempted = call_with_retry(policy, deadline, &operation, || {
            self.index.search(&query.text, mode, limit)
        })
        .await;

        let (status, hits) = match attempted.result {
            Ok(mut hits) => {
                hits.truncate(limit);
                normalize_scores(&mut hits);
                (CallStatus::Ok, hits)
            }
            Err(e) if e.is_timeout() => (CallStatus::TimedOut, Vec::new()),
            Err(e) => (CallStatus::Failed(e.to_string()), Vec::new()),
        };
        if !status.is_ok() {
            tracing::warn!(
                provider = self.index.name(),
                sub_query = %query.text,
                mode = mode.as_str(),
                status = ?status,
                "index call contributed no hits"
            );
        }
        let report = CallReport {
            sub_query: query.text.clone(),
            mode,
            hits: hits.len(),
            attempts: attempted.attempts,
            status,
        };
        (report, hits)
    }
}
