use serde::{Deserialize, Serialize};

use super::question::normalize;

/// Why a sub-query exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubQueryOrigin {
    /// Emitted by the planning model.
    Planned,
    /// Injected to cover a gap reported by the evaluator.
    GapTargeted,
    /// The question itself, used when planning failed.
    Fallback,
}

/// A short search string plus the planning round that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuery {
    pub text: String,
    pub round: u32,
    pub origin: SubQueryOrigin,
}

impl SubQuery {
    pub fn planned(text: impl Into<String>, round: u32) -> Self {
        Self::with_origin(text, round, SubQueryOrigin::Planned)
    }

    pub fn gap_targeted(text: impl Into<String>, round: u32) -> Self {
        Self::with_origin(text, round, SubQueryOrigin::GapTargeted)
    }

    pub fn fallback(text: impl Into<String>, round: u32) -> Self {
        Self::with_origin(text, round, SubQueryOrigin::Fallback)
    }

    fn with_origin(text: impl Into<String>, round: u32, origin: SubQueryOrigin) -> Self {
        Self {
            text: text.into().trim().to_string(),
            round,
            origin,
        }
    }

    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }

    /// Case-insensitive containment check.
    pub fn mentions(&self, needle: &str) -> bool {
        self.normalized().contains(&normalize(needle))
    }
}

/// True when both sets carry byte-identical texts in the same order.
pub fn same_texts(a: &[SubQuery], b: &[SubQuery]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.text == y.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_texts_ignores_round_and_origin() {
        let a = vec![SubQuery::planned("Revenue 2023", 1)];
        let b = vec![SubQuery::gap_targeted("Revenue 2023", 2)];
        assert!(same_texts(&a, &b));
        let c = vec![SubQuery::planned("revenue 2023", 2)];
        assert!(!same_texts(&a, &c));
    }

    #[test]
    fn mentions_is_case_insensitive() {
        let q = SubQuery::planned("Company A revenue q4 2023", 1);
        assert!(q.mentions("Q4"));
        assert!(!q.mentions("Q3"));
    }
}
