//! PipelineController: sequences the stages of one run.
//!
//! ROUTING → PLANNING → RETRIEVING → FUSING → RERANKING → SYNTHESIZING →
//! EVALUATING → {DONE, PLANNING}. Every external stage is raced against the
//! run deadline; when it fires the stage future is dropped, which cancels
//! all of its in-flight calls.

use std::future::Future;
use std::sync::Arc;

use fathom_agents::{
    AnswerEvaluator, AnswerSynthesiser, IntentOrchestrator, QueryPlanner, ReasoningClient,
};
use fathom_core::config::FathomConfig;
use fathom_core::errors::{ConfigError, PipelineError};
use fathom_core::models::{
    Answer, AnswerConfidence, Classification, EvidenceSet, PipelineState, Question, Route,
    RunOutcome, RunTrace, Stage, StageOutput, StageUsage, SubQuery, Verdict,
};
use fathom_core::resilience::RunDeadline;
use fathom_core::traits::{IIndexProvider, IReasoningModel};
use fathom_observability::tracing_setup::events;
use fathom_retrieval::{CandidateRetriever, FusionEngine, Reranker};
use fathom_tokens::TokenCounter;
use serde::Serialize;
use tokio::time::Instant;

use crate::machine::PipelineEvent;
use crate::run::PipelineRun;

/// What a finished run hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub question: Question,
    pub answer: Answer,
    pub verdict: Verdict,
    pub outcome: RunOutcome,
    pub classification: Option<Classification>,
    /// Sub-queries of the last research round.
    pub sub_queries: Vec<SubQuery>,
    /// Evidence the final answer was synthesised from.
    pub evidence: EvidenceSet,
    pub trace: RunTrace,
}

/// Owns the stages and runs questions through them.
///
/// Share one controller across concurrent runs behind an `Arc`: the
/// providers, the config and the classification cache are the only shared
/// state.
pub struct PipelineController {
    config: FathomConfig,
    orchestrator: IntentOrchestrator,
    planner: QueryPlanner,
    retriever: CandidateRetriever,
    fusion: FusionEngine,
    reranker: Reranker,
    synthesiser: AnswerSynthesiser,
    evaluator: AnswerEvaluator,
}

impl PipelineController {
    pub fn new(
        config: FathomConfig,
        index: Arc<dyn IIndexProvider>,
        model: Arc<dyn IReasoningModel>,
    ) -> Result<Self, ConfigError> {
        Self::with_tokens(config, index, model, TokenCounter::default())
    }

    pub fn with_tokens(
        config: FathomConfig,
        index: Arc<dyn IIndexProvider>,
        model: Arc<dyn IReasoningModel>,
        tokens: TokenCounter,
    ) -> Result<Self, ConfigError> {
        FathomConfig::validate(&config)?;
        let exact_tokens = tokens.is_exact();
        let client = ReasoningClient::new(model, config.agents.model_policy(), tokens);
        tracing::info!(
            model = client.model_name(),
            index = index.name(),
            max_rounds = config.pipeline.max_rounds,
            exact_tokens,
            "pipeline controller ready"
        );
        Ok(Self {
            orchestrator: IntentOrchestrator::new(client.clone(), &config.agents),
            planner: QueryPlanner::new(client.clone(), &config.agents),
            retriever: CandidateRetriever::new(index, config.retrieval.clone()),
            fusion: FusionEngine::new(config.fusion.clone(), config.bias.clone()),
            reranker: Reranker::new(
                client.clone(),
                &config.retrieval,
                config.agents.temperatures.reranker,
            ),
            synthesiser: AnswerSynthesiser::new(client.clone(), &config.agents),
            evaluator: AnswerEvaluator::new(client, &config.agents, &config.evaluation),
            config,
        })
    }

    pub fn config(&self) -> &FathomConfig {
        &self.config
    }

    /// Route `question` only; no research is done.
    pub async fn classify(&self, question: &Question) -> Classification {
        let deadline = RunDeadline::after(self.config.pipeline.outer_deadline());
        self.orchestrator.classify(question, deadline).await.value
    }

    /// Answer `question`. Provider failures, malformed model output and
    /// deadline expiry all end in a `RunResult`; an error means the state
    /// machine itself was driven out of order.
    pub async fn run(&self, question: Question) -> Result<RunResult, PipelineError> {
        let deadline = RunDeadline::after(self.config.pipeline.outer_deadline());
        let mut run = PipelineRun::new(question);
        tracing::info!(run_id = %run.run_id(), question = %run.question.text(), "run started");

        self.route(&mut run, deadline).await?;
        while run.state() == PipelineState::Planning {
            run.begin_round();
            self.research_round(&mut run, deadline).await?;
        }
        Ok(self.conclude(run))
    }

    async fn route(&self, run: &mut PipelineRun, deadline: RunDeadline) -> Result<(), PipelineError> {
        let started = Instant::now();
        let Some(out) = within(deadline, self.orchestrator.classify(&run.question, deadline)).await
        else {
            run.expire(Stage::Routing)?;
            return Ok(());
        };
        let classification = run.record(Stage::Routing, started, out);
        run.classification = Some(classification);

        if classification.is_direct() {
            let started = Instant::now();
            let Some(out) =
                within(deadline, self.orchestrator.answer_directly(&run.question, deadline)).await
            else {
                run.expire(Stage::Direct)?;
                return Ok(());
            };
            if let Some(answer) = run.record(Stage::Direct, started, out) {
                run.answer = Some(answer);
                run.verdict = Some(Verdict::direct());
                run.apply(PipelineEvent::Routed(Route::Direct))?;
                return Ok(());
            }
            tracing::info!(run_id = %run.run_id(), "direct answer unavailable, researching instead");
        }
        run.apply(PipelineEvent::Routed(Route::Research))?;
        Ok(())
    }

    /// One pass from PLANNING to EVALUATING. Leaves the run in PLANNING
    /// for a retry or in a terminal state.
    async fn research_round(
        &self,
        run: &mut PipelineRun,
        deadline: RunDeadline,
    ) -> Result<(), PipelineError> {
        let round = run.round;

        let started = Instant::now();
        let prior = run
            .verdict
            .as_ref()
            .map(|v| (run.sub_queries.as_slice(), &v.feedback));
        let Some(out) = within(deadline, self.planner.plan(&run.question, prior, round, deadline)).await
        else {
            run.expire(Stage::Planning)?;
            return Ok(());
        };
        run.sub_queries = run.record(Stage::Planning, started, out);
        run.apply(PipelineEvent::Planned)?;

        let started = Instant::now();
        let Some(out) = within(deadline, self.retriever.retrieve(&run.sub_queries, deadline)).await
        else {
            run.expire(Stage::Retrieving)?;
            return Ok(());
        };
        let retrieved = run.record(Stage::Retrieving, started, out);
        run.apply(PipelineEvent::Retrieved)?;

        if deadline.is_expired() {
            run.expire(Stage::Fusing)?;
            return Ok(());
        }
        let started = Instant::now();
        let fused = self.fusion.fuse(&retrieved.hits);
        tracing::debug!(
            run_id = %run.run_id(),
            round,
            candidates = fused.candidates.len(),
            boosted_groups = ?fused.boosted_groups,
            "round fused"
        );
        let candidates = run.record(
            Stage::Fusing,
            started,
            StageOutput::new(fused.candidates, StageUsage::default()),
        );
        run.apply(PipelineEvent::Fused)?;

        let started = Instant::now();
        let Some(out) =
            within(deadline, self.reranker.rerank(&run.question, candidates, deadline)).await
        else {
            run.expire(Stage::Reranking)?;
            return Ok(());
        };
        run.evidence = run.record(Stage::Reranking, started, out);
        run.apply(PipelineEvent::Reranked)?;

        let started = Instant::now();
        let Some(out) = within(
            deadline,
            self.synthesiser
                .synthesize(&run.question, &run.evidence, round, deadline),
        )
        .await
        else {
            run.expire(Stage::Synthesizing)?;
            return Ok(());
        };
        let answer = run.record(Stage::Synthesizing, started, out);
        run.answer = Some(answer.clone());
        run.apply(PipelineEvent::Synthesized)?;

        let started = Instant::now();
        let verdict = match answer.verify_citations(&run.evidence) {
            Err(violation) => {
                tracing::warn!(
                    run_id = %run.run_id(),
                    round,
                    violation = %violation,
                    "answer rejected before evaluation"
                );
                let verdict = Verdict::citation_integrity_failure(&violation, round);
                run.record(
                    Stage::Evaluating,
                    started,
                    StageOutput::new(verdict, StageUsage::default()),
                )
            }
            Ok(()) => {
                let Some(out) = within(
                    deadline,
                    self.evaluator
                        .evaluate(&run.question, &answer, &run.evidence, round, deadline),
                )
                .await
                else {
                    run.expire(Stage::Evaluating)?;
                    return Ok(());
                };
                run.record(Stage::Evaluating, started, out)
            }
        };
        run.count_evaluation();
        events::verdict_issued(run.run_id(), &verdict);
        let decision = verdict.decision;
        run.verdict = Some(verdict);
        run.apply(PipelineEvent::Evaluated {
            decision,
            round,
            max_rounds: self.config.pipeline.max_rounds,
        })?;
        Ok(())
    }

    fn conclude(&self, mut run: PipelineRun) -> RunResult {
        let outcome = match run.state() {
            PipelineState::Done(outcome) => outcome,
            other => {
                tracing::error!(state = %other, "run stopped outside a terminal state");
                RunOutcome::Exhausted
            }
        };
        let trace = run.finish_trace();

        let answer = match (outcome, run.answer.take()) {
            (RunOutcome::Accepted, Some(answer)) => answer.annotated(AnswerConfidence::Verified),
            (RunOutcome::Direct, Some(answer)) => answer,
            (_, Some(answer)) => answer.annotated(AnswerConfidence::Unverified),
            (_, None) => Answer::timed_out(run.round),
        };
        let verdict = match run.verdict.take() {
            Some(verdict) if !trace.deadline_exceeded => verdict,
            _ => Verdict::deadline_exceeded(run.round),
        };

        events::run_completed(&trace.run_id, outcome, trace.rounds, trace.total_elapsed_ms);
        RunResult {
            question: run.question,
            answer,
            verdict,
            outcome,
            classification: run.classification,
            sub_queries: run.sub_queries,
            evidence: run.evidence,
            trace,
        }
    }
}

/// `fut`'s output, or `None` if the run deadline fires first. A stage is
/// never started once the deadline has passed.
async fn within<F: Future>(deadline: RunDeadline, fut: F) -> Option<F::Output> {
    if deadline.is_expired() {
        return None;
    }
    tokio::time::timeout_at(deadline.instant(), fut).await.ok()
}
