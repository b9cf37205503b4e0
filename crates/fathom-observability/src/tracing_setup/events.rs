//! Structured log events for the pipeline lifecycle.
//!
//! Each function emits a `tracing` event with structured fields.

use fathom_core::models::{DegradationEvent, PipelineState, RunOutcome, Stage, StageTrace, Verdict};

/// Log a controller state transition.
pub fn stage_transition(run_id: &str, from: PipelineState, to: PipelineState, elapsed_ms: u64) {
    tracing::info!(
        event = "stage_transition",
        run_id = %run_id,
        from = %from,
        to = %to,
        elapsed_ms = elapsed_ms,
        "stage transition"
    );
}

/// Log the cost of one completed stage.
pub fn stage_completed(run_id: &str, trace: &StageTrace) {
    tracing::debug!(
        event = "stage_completed",
        run_id = %run_id,
        stage = %trace.stage,
        round = trace.round,
        elapsed_ms = trace.elapsed_ms,
        model_calls = trace.usage.model_calls,
        index_calls = trace.usage.index_calls,
        failed_calls = trace.usage.failed_calls,
        prompt_tokens = trace.usage.prompt_tokens,
        completion_tokens = trace.usage.completion_tokens,
        degraded = trace.degraded,
        "stage completed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(event: &DegradationEvent) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %event.component,
        failure = %event.failure,
        fallback = %event.fallback_used,
        "degradation triggered"
    );
}

/// Log an evaluator verdict.
pub fn verdict_issued(run_id: &str, verdict: &Verdict) {
    tracing::info!(
        event = "verdict_issued",
        run_id = %run_id,
        round = verdict.round,
        decision = ?verdict.decision,
        basis = ?verdict.basis,
        hallucination_score = verdict.hallucination_score,
        complete = verdict.complete,
        feedback = %verdict.feedback.message,
        "verdict issued"
    );
}

/// Log the end of a run.
pub fn run_completed(run_id: &str, outcome: RunOutcome, rounds: u32, total_elapsed_ms: u64) {
    tracing::info!(
        event = "run_completed",
        run_id = %run_id,
        outcome = %outcome,
        rounds = rounds,
        total_elapsed_ms = total_elapsed_ms,
        "run completed"
    );
}

/// Log that the run deadline cut a stage short.
pub fn deadline_exceeded(run_id: &str, stage: Stage, round: u32) {
    tracing::warn!(
        event = "deadline_exceeded",
        run_id = %run_id,
        stage = %stage,
        round = round,
        "run deadline exceeded"
    );
}
