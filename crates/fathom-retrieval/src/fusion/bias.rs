//! Group-fairness boosting.
//!
//! A coverage group whose mean fused score falls below the floor has every
//! member multiplied by the boost factor, once. Untagged candidates are
//! never boosted.

use std::collections::BTreeMap;

use fathom_core::config::BiasConfig;
use fathom_core::models::Candidate;

/// Boost under-represented groups. Returns the candidates (input order) and
/// the names of the boosted groups.
pub fn apply_group_boost(candidates: Vec<Candidate>, bias: &BiasConfig) -> (Vec<Candidate>, Vec<String>) {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for c in &candidates {
        if let Some(group) = c.group() {
            let entry = sums.entry(group).or_insert((0.0, 0));
            entry.0 += c.base_score;
            entry.1 += 1;
        }
    }
    let boosted_groups: Vec<String> = sums
        .into_iter()
        .filter(|(_, (sum, n))| sum / (*n as f64) < bias.floor)
        .map(|(g, _)| g.to_string())
        .collect();

    if boosted_groups.is_empty() {
        return (candidates, boosted_groups);
    }

    let boosted = candidates
        .into_iter()
        .map(|c| match c.group() {
            Some(g) if boosted_groups.iter().any(|b| b == g) => {
                c.boosted_by(bias.boost_factor, bias.boost_cap)
            }
            _ => c,
        })
        .collect();
    (boosted, boosted_groups)
}
