use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateKey};

/// Re-ranked candidates in final relevance order, at most top-K long,
/// without duplicate keys. Citations index into it 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSet {
    candidates: Vec<Candidate>,
    digest: String,
}

impl EvidenceSet {
    /// Build an evidence set, keeping the first occurrence of each key.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let mut seen: HashSet<CandidateKey> = HashSet::new();
        let candidates: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| seen.insert(c.key.clone()))
            .collect();
        let digest = digest_of(&candidates);
        Self { candidates, digest }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up a candidate by its 1-based citation index.
    pub fn cited(&self, index: usize) -> Option<&Candidate> {
        index.checked_sub(1).and_then(|i| self.candidates.get(i))
    }

    /// blake3 digest over the ordered candidate keys.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Distinct coverage groups present.
    pub fn groups(&self) -> BTreeSet<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.metadata.group.clone())
            .collect()
    }
}

fn digest_of(candidates: &[Candidate]) -> String {
    let mut hasher = blake3::Hasher::new();
    for c in candidates {
        hasher.update(c.key.doc_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(c.key.span_hash.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
