//! Batch acceptance criteria and the per-category disparity check.

use std::collections::BTreeMap;

use fathom_core::config::ValidationConfig;
use fathom_core::models::{RunOutcome, Verdict};
use serde::Serialize;

use super::run_metrics::RunMetrics;

/// Quality of one run as judged by the batch harness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunScore {
    /// Mean of groundedness and expected-content coverage, in [0, 1].
    pub quality: f64,
    /// Answered (accepted or direct) and every expected string present.
    pub passed: bool,
}

impl RunScore {
    pub fn assess(outcome: RunOutcome, verdict: &Verdict, expected_coverage: f64) -> Self {
        let groundedness = verdict.groundedness().clamp(0.0, 1.0);
        let coverage = expected_coverage.clamp(0.0, 1.0);
        Self {
            quality: (groundedness + coverage) / 2.0,
            passed: outcome != RunOutcome::Exhausted && coverage >= 1.0,
        }
    }
}

/// Share of `expected` strings found in `answer`, case-insensitively.
/// Nothing expected counts as full coverage.
pub fn expected_coverage(answer: &str, expected: &[String]) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }
    let haystack = answer.to_lowercase();
    let found = expected
        .iter()
        .filter(|e| haystack.contains(&e.to_lowercase()))
        .count();
    found as f64 / expected.len() as f64
}

/// One threshold comparison.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionCheck {
    pub name: &'static str,
    pub threshold: f64,
    pub actual: f64,
    pub passed: bool,
}

impl CriterionCheck {
    fn at_most(name: &'static str, actual: f64, threshold: f64) -> Self {
        Self {
            name,
            threshold,
            actual,
            passed: actual <= threshold,
        }
    }

    fn at_least(name: &'static str, actual: f64, threshold: f64) -> Self {
        Self {
            name,
            threshold,
            actual,
            passed: actual >= threshold,
        }
    }
}

/// Mean quality per category and the gap between the best and worst.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCheck {
    pub passed: bool,
    /// No category reached the sample minimum.
    pub skipped: bool,
    pub groups: BTreeMap<String, f64>,
    pub max_gap: f64,
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub criteria: Vec<CriterionCheck>,
    pub groups: GroupCheck,
}

impl ValidationReport {
    /// Human-readable reasons the batch failed.
    pub fn failures(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .criteria
            .iter()
            .filter(|c| !c.passed)
            .map(|c| format!("{} {:.3} misses threshold {:.3}", c.name, c.actual, c.threshold))
            .collect();
        out.extend(self.groups.failures.iter().cloned());
        out
    }
}

impl RunMetrics {
    /// Check the aggregate against the acceptance criteria.
    pub fn validate(&self, criteria: &ValidationConfig) -> ValidationReport {
        let checks = vec![
            CriterionCheck::at_most(
                "mean_hallucination",
                self.mean_hallucination().unwrap_or(0.0),
                criteria.max_mean_hallucination,
            ),
            CriterionCheck::at_least("mean_quality", self.mean_quality(), criteria.min_mean_quality),
            CriterionCheck::at_least("pass_rate", self.pass_rate(), criteria.min_pass_rate),
            CriterionCheck::at_most(
                "mean_latency_ms",
                self.mean_latency_ms(),
                criteria.max_mean_latency_ms as f64,
            ),
        ];
        let groups = self.check_groups(criteria);
        let passed = checks.iter().all(|c| c.passed) && groups.passed;
        tracing::info!(
            passed,
            runs = self.runs,
            pass_rate = self.pass_rate(),
            mean_quality = self.mean_quality(),
            "batch validated"
        );
        ValidationReport {
            passed,
            criteria: checks,
            groups,
        }
    }

    fn check_groups(&self, criteria: &ValidationConfig) -> GroupCheck {
        let groups: BTreeMap<String, f64> = self
            .by_category
            .iter()
            .filter(|(_, s)| s.runs >= criteria.min_group_samples)
            .map(|(name, s)| (name.clone(), s.mean_quality()))
            .collect();

        if groups.is_empty() {
            return GroupCheck {
                passed: true,
                skipped: true,
                groups,
                max_gap: 0.0,
                failures: Vec::new(),
            };
        }

        let best = groups.values().copied().fold(f64::MIN, f64::max);
        let worst = groups.values().copied().fold(f64::MAX, f64::min);
        let max_gap = best - worst;

        let mut failures: Vec<String> = groups
            .iter()
            .filter(|(_, q)| **q < criteria.min_group_quality)
            .map(|(name, q)| {
                format!(
                    "category {name} mean quality {q:.3} is below {:.3}",
                    criteria.min_group_quality
                )
            })
            .collect();
        if max_gap > criteria.max_group_gap {
            failures.push(format!(
                "category quality gap {max_gap:.3} exceeds {:.3}",
                criteria.max_group_gap
            ));
        }

        GroupCheck {
            passed: failures.is_empty(),
            skipped: false,
            groups,
            max_gap,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_is_case_insensitive_and_partial() {
        let expected = vec!["$4.2 billion".to_string(), "Company B".to_string()];
        assert_eq!(expected_coverage("Company A earned $4.2 BILLION", &expected), 0.5);
        assert_eq!(expected_coverage("anything", &[]), 1.0);
    }

    #[test]
    fn exhausted_or_incomplete_runs_do_not_pass() {
        let verdict = Verdict::direct();
        assert!(RunScore::assess(RunOutcome::Direct, &verdict, 1.0).passed);
        assert!(!RunScore::assess(RunOutcome::Exhausted, &verdict, 1.0).passed);
        let partial = RunScore::assess(RunOutcome::Accepted, &verdict, 0.5);
        assert!(!partial.passed);
        assert!((partial.quality - 0.75).abs() < 1e-9);
    }
}
