//! Outcome counts, rounds, degradations, token totals, per-category acceptance
//! and quality.

use std::collections::BTreeMap;

use fathom_core::models::{QueryCategory, RunOutcome, RunTrace, Verdict};
use serde::{Deserialize, Serialize};

use super::validation::RunScore;

/// Acceptance and quality for one question category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub runs: u64,
    pub accepted: u64,
    pub passed: u64,
    pub quality_sum: f64,
}

impl CategoryStats {
    pub fn acceptance_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.runs as f64
    }

    pub fn mean_quality(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.quality_sum / self.runs as f64
    }
}

/// Aggregate view over many runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub runs: u64,
    pub accepted: u64,
    pub exhausted: u64,
    pub direct: u64,
    pub total_rounds: u64,
    pub evaluator_invocations: u64,
    pub deadline_exceeded: u64,
    /// Degradation count per component.
    pub degradations: BTreeMap<String, u64>,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_elapsed_ms: u64,
    /// Runs whose score passed.
    pub passed: u64,
    quality_sum: f64,
    /// Sum of hallucination scores over research runs with a model verdict.
    hallucination_sum: f64,
    hallucination_samples: u64,
    pub by_category: BTreeMap<String, CategoryStats>,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished run into the aggregate.
    pub fn record(
        &mut self,
        trace: &RunTrace,
        outcome: RunOutcome,
        verdict: &Verdict,
        category: Option<QueryCategory>,
        score: RunScore,
    ) {
        self.runs += 1;
        self.quality_sum += score.quality;
        if score.passed {
            self.passed += 1;
        }
        match outcome {
            RunOutcome::Accepted => self.accepted += 1,
            RunOutcome::Exhausted => self.exhausted += 1,
            RunOutcome::Direct => self.direct += 1,
        }
        self.total_rounds += u64::from(trace.rounds);
        self.evaluator_invocations += u64::from(trace.evaluator_invocations);
        if trace.deadline_exceeded {
            self.deadline_exceeded += 1;
        }
        for d in &trace.degradations {
            *self.degradations.entry(d.component.clone()).or_default() += 1;
        }
        let usage = trace.total_usage();
        self.prompt_tokens += usage.prompt_tokens as u64;
        self.completion_tokens += usage.completion_tokens as u64;
        self.total_elapsed_ms += trace.total_elapsed_ms;

        if outcome != RunOutcome::Direct && trace.evaluator_invocations > 0 {
            self.hallucination_sum += verdict.hallucination_score;
            self.hallucination_samples += 1;
        }

        let key = category
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "unknown".into());
        let stats = self.by_category.entry(key).or_default();
        stats.runs += 1;
        if outcome != RunOutcome::Exhausted {
            stats.accepted += 1;
        }
        if score.passed {
            stats.passed += 1;
        }
        stats.quality_sum += score.quality;
    }

    /// Share of runs that ended with an accepted or direct answer.
    pub fn acceptance_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        (self.accepted + self.direct) as f64 / self.runs as f64
    }

    pub fn mean_rounds(&self) -> f64 {
        let research = self.runs - self.direct;
        if research == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / research as f64
    }

    pub fn mean_hallucination(&self) -> Option<f64> {
        (self.hallucination_samples > 0)
            .then(|| self.hallucination_sum / self.hallucination_samples as f64)
    }

    pub fn mean_quality(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.quality_sum / self.runs as f64
    }

    pub fn pass_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.passed as f64 / self.runs as f64
    }

    pub fn mean_latency_ms(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.total_elapsed_ms as f64 / self.runs as f64
    }

    /// JSON summary including the derived rates.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "runs": self.runs,
            "accepted": self.accepted,
            "exhausted": self.exhausted,
            "direct": self.direct,
            "acceptance_rate": self.acceptance_rate(),
            "passed": self.passed,
            "pass_rate": self.pass_rate(),
            "mean_quality": self.mean_quality(),
            "mean_rounds": self.mean_rounds(),
            "mean_hallucination": self.mean_hallucination(),
            "mean_latency_ms": self.mean_latency_ms(),
            "evaluator_invocations": self.evaluator_invocations,
            "deadline_exceeded": self.deadline_exceeded,
            "degradations": self.degradations,
            "prompt_tokens": self.prompt_tokens,
            "completion_tokens": self.completion_tokens,
            "by_category": self.by_category,
        })
    }
}
