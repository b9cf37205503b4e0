//! Bound the re-rank pool and build the fused-order fallback.

use fathom_core::models::Candidate;

use crate::fusion::sort_candidates;

/// Keep the `max` best candidates by fused score.
pub fn bound_pool(mut candidates: Vec<Candidate>, max: usize) -> Vec<Candidate> {
    sort_candidates(&mut candidates);
    candidates.truncate(max);
    candidates
}

/// Order the pool by model-ranked 0-based indices: valid unique indices
/// first, then everything omitted in pool order, truncated to `top_k`.
/// Returns the order and how many model indices were usable.
pub fn apply_ranking(pool: &[Candidate], ranked: &[i64], top_k: usize) -> (Vec<Candidate>, usize) {
    let mut taken = vec![false; pool.len()];
    let mut ordered: Vec<Candidate> = Vec::with_capacity(pool.len());
    for &idx in ranked {
        let Ok(i) = usize::try_from(idx) else {
            continue;
        };
        if i < pool.len() && !taken[i] {
            taken[i] = true;
            ordered.push(pool[i].clone());
        }
    }
    let valid = ordered.len();
    ordered.extend(
        pool.iter()
            .zip(&taken)
            .filter(|(_, t)| !**t)
            .map(|(c, _)| c.clone()),
    );
    ordered.truncate(top_k);
    (ordered, valid)
}
