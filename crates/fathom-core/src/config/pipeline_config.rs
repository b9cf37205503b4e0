use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Verdict thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Answers with a hallucination score at or above this are rejected.
    pub reject_threshold: f64,
    /// Minimum share of a claim's content words found in its cited text.
    pub min_claim_overlap: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            reject_threshold: defaults::DEFAULT_REJECT_THRESHOLD,
            min_claim_overlap: defaults::DEFAULT_MIN_CLAIM_OVERLAP,
        }
    }
}

/// Controller loop bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Total research rounds, including the first. 2 means one retry.
    pub max_rounds: u32,
    /// Wall-clock budget for one run (milliseconds).
    pub outer_deadline_ms: u64,
}

impl PipelineConfig {
    pub fn outer_deadline(&self) -> Duration {
        Duration::from_millis(self.outer_deadline_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rounds: defaults::DEFAULT_MAX_ROUNDS,
            outer_deadline_ms: defaults::DEFAULT_OUTER_DEADLINE_MS,
        }
    }
}
