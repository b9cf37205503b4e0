use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::degradation_event::DegradationEvent;
use super::stage::Stage;
use super::state::PipelineState;

/// External call and token counts for one stage execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUsage {
    pub model_calls: u32,
    pub index_calls: u32,
    /// Calls that failed after all retries.
    pub failed_calls: u32,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl StageUsage {
    pub fn merge(&mut self, other: &StageUsage) {
        self.model_calls += other.model_calls;
        self.index_calls += other.index_calls;
        self.failed_calls += other.failed_calls;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }

    pub fn total_tokens(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTrace {
    pub stage: Stage,
    pub round: u32,
    pub elapsed_ms: u64,
    pub usage: StageUsage,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: PipelineState,
    pub to: PipelineState,
    pub event: String,
    /// Milliseconds since the run started.
    pub at_ms: u64,
}

/// Everything observable about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTrace {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub stages: Vec<StageTrace>,
    pub transitions: Vec<TransitionRecord>,
    /// Research rounds started.
    pub rounds: u32,
    pub evaluator_invocations: u32,
    pub degradations: Vec<DegradationEvent>,
    pub deadline_exceeded: bool,
    pub total_elapsed_ms: u64,
}

impl RunTrace {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            stages: Vec::new(),
            transitions: Vec::new(),
            rounds: 0,
            evaluator_invocations: 0,
            degradations: Vec::new(),
            deadline_exceeded: false,
            total_elapsed_ms: 0,
        }
    }

    /// Usage summed over all stages.
    pub fn total_usage(&self) -> StageUsage {
        let mut total = StageUsage::default();
        for s in &self.stages {
            total.merge(&s.usage);
        }
        total
    }

    pub fn stages_of(&self, stage: Stage) -> impl Iterator<Item = &StageTrace> {
        self.stages.iter().filter(move |s| s.stage == stage)
    }

    pub fn ran(&self, stage: Stage) -> bool {
        self.stages_of(stage).next().is_some()
    }
}

impl Default for RunTrace {
    fn default() -> Self {
        Self::new()
    }
}
