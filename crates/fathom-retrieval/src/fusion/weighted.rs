//! Weighted score fusion: fused = w_sem * semantic + w_kw * keyword.
//!
//! The same passage surfaced by several sub-queries or both methods counts
//! once; per method its best score wins. A method that missed it adds 0.

use std::collections::HashMap;

use fathom_core::config::FusionConfig;
use fathom_core::models::{Candidate, CandidateKey, SearchMode};

use crate::search::TaggedHit;

/// Merge hits by key and compute the weighted fused score.
/// Output order follows first appearance of each key.
pub fn fuse(hits: &[TaggedHit], weights: &FusionConfig) -> Vec<Candidate> {
    let mut index: HashMap<CandidateKey, usize> = HashMap::new();
    let mut merged: Vec<Candidate> = Vec::new();

    for tagged in hits {
        let hit = &tagged.hit;
        let key = hit.key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            merged.push(Candidate {
                key,
                doc_id: hit.doc_id.clone(),
                span: hit.span.clone(),
                text: hit.text.clone(),
                metadata: hit.metadata.clone(),
                semantic_score: 0.0,
                keyword_score: 0.0,
                fused_score: 0.0,
                base_score: 0.0,
                boosted: false,
            });
            merged.len() - 1
        });
        let c = &mut merged[slot];
        match tagged.mode {
            SearchMode::Semantic => c.semantic_score = c.semantic_score.max(hit.score),
            SearchMode::Keyword => c.keyword_score = c.keyword_score.max(hit.score),
        }
    }

    for c in &mut merged {
        let fused =
            weights.semantic_weight * c.semantic_score + weights.keyword_weight * c.keyword_score;
        c.fused_score = fused;
        c.base_score = fused;
    }
    merged
}
