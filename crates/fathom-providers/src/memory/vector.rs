//! Sparse term-frequency vectors and their cosine similarity.

use std::collections::HashMap;

pub type TermVector = HashMap<String, f64>;

pub fn term_vector(tokens: &[String]) -> TermVector {
    let mut v = TermVector::new();
    for t in tokens {
        *v.entry(t.clone()).or_insert(0.0) += 1.0;
    }
    v
}

/// Cosine in [0, 1]; 0 when either vector is empty.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(t, x)| large.get(t).map(|y| x * y))
        .sum();
    let norm = |v: &TermVector| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}
