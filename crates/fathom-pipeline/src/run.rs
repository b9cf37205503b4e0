//! PipelineRun: the state of one run, owned by the controller.

use fathom_core::errors::PipelineError;
use fathom_core::models::{
    Answer, Classification, EvidenceSet, PipelineState, Question, RunTrace, Stage, StageOutput,
    StageTrace, SubQuery, TransitionRecord, Verdict,
};
use fathom_observability::tracing_setup::events;
use fathom_observability::DegradationTracker;
use tokio::time::Instant;

use crate::machine::{transition, PipelineEvent};

/// Everything one run has produced so far. Stages only ever see borrows of
/// these fields; new values replace old ones wholesale.
#[derive(Debug)]
pub struct PipelineRun {
    pub question: Question,
    pub classification: Option<Classification>,
    pub sub_queries: Vec<SubQuery>,
    pub evidence: EvidenceSet,
    pub answer: Option<Answer>,
    pub verdict: Option<Verdict>,
    /// Research round in progress, 1-based. 0 before planning starts.
    pub round: u32,
    state: PipelineState,
    trace: RunTrace,
    degradations: DegradationTracker,
    started: Instant,
}

impl PipelineRun {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            classification: None,
            sub_queries: Vec::new(),
            evidence: EvidenceSet::empty(),
            answer: None,
            verdict: None,
            round: 0,
            state: PipelineState::Routing,
            trace: RunTrace::new(),
            degradations: DegradationTracker::new(),
            started: Instant::now(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.trace.run_id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn trace(&self) -> &RunTrace {
        &self.trace
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Advance the state machine and record the transition.
    pub fn apply(&mut self, event: PipelineEvent) -> Result<PipelineState, PipelineError> {
        let from = self.state;
        let to = transition(from, event)?;
        let at_ms = self.elapsed_ms();
        events::stage_transition(&self.trace.run_id, from, to, at_ms);
        self.trace.transitions.push(TransitionRecord {
            from,
            to,
            event: event.to_string(),
            at_ms,
        });
        self.state = to;
        Ok(to)
    }

    pub fn begin_round(&mut self) {
        self.round += 1;
        self.trace.rounds = self.round;
    }

    pub fn count_evaluation(&mut self) {
        self.trace.evaluator_invocations += 1;
    }

    /// Record a finished stage and hand back its value.
    pub fn record<T>(&mut self, stage: Stage, started: Instant, output: StageOutput<T>) -> T {
        let trace = StageTrace {
            stage,
            round: self.round,
            elapsed_ms: started.elapsed().as_millis() as u64,
            usage: output.usage,
            degraded: output.is_degraded(),
        };
        events::stage_completed(&self.trace.run_id, &trace);
        self.trace.stages.push(trace);
        self.degradations.extend(output.degradations);
        output.value
    }

    /// Mark the run as cut short by the deadline during `stage`.
    pub fn expire(&mut self, stage: Stage) -> Result<PipelineState, PipelineError> {
        events::deadline_exceeded(&self.trace.run_id, stage, self.round);
        self.trace.deadline_exceeded = true;
        self.apply(PipelineEvent::DeadlineExpired)
    }

    /// Snapshot of the trace with totals and degradations filled in.
    pub fn finish_trace(&self) -> RunTrace {
        let mut trace = self.trace.clone();
        trace.total_elapsed_ms = self.elapsed_ms();
        if !self.degradations.is_empty() {
            tracing::info!(
                run_id = %trace.run_id,
                by_component = ?self.degradations.count_by_component(),
                "run finished degraded"
            );
        }
        trace.degradations = self.degradations.events().to_vec();
        trace
    }
}
