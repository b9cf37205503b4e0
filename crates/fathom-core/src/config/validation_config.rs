use serde::{Deserialize, Serialize};

use super::defaults;

/// Acceptance criteria for `fathom batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Highest mean hallucination score over evaluated research runs.
    pub max_mean_hallucination: f64,
    /// Lowest mean per-run quality score.
    pub min_mean_quality: f64,
    /// Lowest share of runs that passed.
    pub min_pass_rate: f64,
    /// Highest mean wall-clock time per run (milliseconds).
    pub max_mean_latency_ms: u64,
    /// Categories with fewer runs are left out of the group check.
    pub min_group_samples: u64,
    /// Lowest mean quality any one category may have.
    pub min_group_quality: f64,
    /// Largest allowed gap between the best and worst category.
    pub max_group_gap: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_mean_hallucination: defaults::DEFAULT_MAX_MEAN_HALLUCINATION,
            min_mean_quality: defaults::DEFAULT_MIN_MEAN_QUALITY,
            min_pass_rate: defaults::DEFAULT_MIN_PASS_RATE,
            max_mean_latency_ms: defaults::DEFAULT_MAX_MEAN_LATENCY_MS,
            min_group_samples: defaults::DEFAULT_MIN_GROUP_SAMPLES,
            min_group_quality: defaults::DEFAULT_MIN_GROUP_QUALITY,
            max_group_gap: defaults::DEFAULT_MAX_GROUP_GAP,
        }
    }
}
