//! Fusion of dual-ranked hit lists into one scored candidate per passage,
//! followed by group-fairness boosting.

pub mod bias;
pub mod weighted;

use std::cmp::Ordering;

use fathom_core::config::{BiasConfig, FusionConfig};
use fathom_core::models::Candidate;

use crate::search::TaggedHit;

/// Fused candidates in final order plus the groups that were boosted.
#[derive(Debug, Clone, Default)]
pub struct FusionResult {
    pub candidates: Vec<Candidate>,
    pub boosted_groups: Vec<String>,
}

/// Weighted fusion plus fairness boosting, configured once per run.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    fusion: FusionConfig,
    bias: BiasConfig,
}

impl FusionEngine {
    pub fn new(fusion: FusionConfig, bias: BiasConfig) -> Self {
        Self { fusion, bias }
    }

    /// Fuse one round's hits. Candidates are rebuilt from the hits every
    /// call, so the boost can never compound across rounds.
    pub fn fuse(&self, hits: &[TaggedHit]) -> FusionResult {
        let fused = weighted::fuse(hits, &self.fusion);
        let (mut candidates, boosted_groups) = bias::apply_group_boost(fused, &self.bias);
        sort_candidates(&mut candidates);
        if !boosted_groups.is_empty() {
            tracing::debug!(groups = ?boosted_groups, "fairness boost applied");
        }
        FusionResult {
            candidates,
            boosted_groups,
        }
    }
}

/// Fused score descending, then pre-boost score descending, then key.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(compare_candidates);
}

pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.fused_score
        .partial_cmp(&a.fused_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.base_score
                .partial_cmp(&a.base_score)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.key.cmp(&b.key))
}
