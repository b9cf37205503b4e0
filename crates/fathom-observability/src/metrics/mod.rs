//! Metrics aggregated across runs.

mod run_metrics;
mod validation;

pub use run_metrics::{CategoryStats, RunMetrics};
pub use validation::{
    expected_coverage, CriterionCheck, GroupCheck, RunScore, ValidationReport,
};
