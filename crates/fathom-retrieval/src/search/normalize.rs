//! Per-list score normalisation into [0, 1].

use fathom_core::models::SearchHit;

/// Clamp negatives to 0 and, when the list maximum exceeds 1.0, divide by it.
/// Non-finite scores count as 0.
pub fn normalize_scores(hits: &mut [SearchHit]) {
    for h in hits.iter_mut() {
        if !h.score.is_finite() || h.score < 0.0 {
            h.score = 0.0;
        }
    }
    let max = hits.iter().map(|h| h.score).fold(0.0_f64, f64::max);
    if max > 1.0 {
        for h in hits.iter_mut() {
            h.score /= max;
        }
    }
}
