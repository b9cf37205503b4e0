use serde::{Deserialize, Serialize};

use super::evidence_set::EvidenceSet;
use crate::constants::{LOW_CONFIDENCE_DISCLOSURE, TIMED_OUT_DISCLOSURE};
use crate::errors::ContractError;

/// An atomic assertion with 1-based citations into the evidence set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<usize>,
}

impl Claim {
    pub fn new(text: impl Into<String>, citations: Vec<usize>) -> Self {
        Self {
            text: text.into(),
            citations,
        }
    }
}

/// Confidence annotation attached by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerConfidence {
    /// Synthesised but not yet evaluated.
    Pending,
    Verified,
    Unverified,
    Direct,
    TimedOut,
}

/// A synthesised answer bound to the evidence set it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub summary: String,
    pub findings: Vec<Claim>,
    pub analysis: Vec<Claim>,
    pub gaps: Vec<String>,
    /// Digest of the evidence set handed to the synthesiser.
    pub evidence_digest: String,
    pub confidence: AnswerConfidence,
    pub disclosure: Option<String>,
    pub round: u32,
}

impl Answer {
    /// Answer that only reports what could not be covered.
    pub fn gaps_only(gaps: Vec<String>, evidence: &EvidenceSet, round: u32) -> Self {
        Self {
            summary: String::new(),
            findings: Vec::new(),
            analysis: Vec::new(),
            gaps,
            evidence_digest: evidence.digest().to_string(),
            confidence: AnswerConfidence::Pending,
            disclosure: None,
            round,
        }
    }

    /// Short answer for a question routed around research. No citations.
    pub fn direct(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            findings: Vec::new(),
            analysis: Vec::new(),
            gaps: Vec::new(),
            evidence_digest: EvidenceSet::empty().digest().to_string(),
            confidence: AnswerConfidence::Direct,
            disclosure: None,
            round: 0,
        }
    }

    /// Placeholder when the run deadline expired before synthesis completed.
    pub fn timed_out(round: u32) -> Self {
        Self {
            summary: String::new(),
            findings: Vec::new(),
            analysis: Vec::new(),
            gaps: vec!["timed out, no answer was produced".to_string()],
            evidence_digest: EvidenceSet::empty().digest().to_string(),
            confidence: AnswerConfidence::TimedOut,
            disclosure: Some(TIMED_OUT_DISCLOSURE.to_string()),
            round,
        }
    }

    /// Findings followed by analysis claims.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.findings.iter().chain(self.analysis.iter())
    }

    pub fn claim_count(&self) -> usize {
        self.findings.len() + self.analysis.len()
    }

    pub fn has_claims(&self) -> bool {
        self.claim_count() > 0
    }

    /// Distinct citation indices in first-use order.
    pub fn cited_indices(&self) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for idx in self.claims().flat_map(|c| c.citations.iter().copied()) {
            if !out.contains(&idx) {
                out.push(idx);
            }
        }
        out
    }

    /// Check that the answer was built from `evidence` and every claim
    /// cites at least one entry that exists in it.
    pub fn verify_citations(&self, evidence: &EvidenceSet) -> Result<(), ContractError> {
        if self.evidence_digest != evidence.digest() {
            return Err(ContractError::EvidenceMismatch {
                expected: evidence.digest().to_string(),
                actual: self.evidence_digest.clone(),
            });
        }
        for (i, claim) in self.claims().enumerate() {
            let claim_no = i + 1;
            if claim.citations.is_empty() {
                return Err(ContractError::UncitedClaim { claim: claim_no });
            }
            if let Some(&bad) = claim
                .citations
                .iter()
                .find(|&&idx| evidence.cited(idx).is_none())
            {
                return Err(ContractError::CitationOutOfRange {
                    claim: claim_no,
                    index: bad,
                    evidence_len: evidence.len(),
                });
            }
        }
        Ok(())
    }

    /// Copy with the given confidence annotation and its disclosure.
    pub fn annotated(&self, confidence: AnswerConfidence) -> Answer {
        let disclosure = match confidence {
            AnswerConfidence::Unverified => Some(LOW_CONFIDENCE_DISCLOSURE.to_string()),
            AnswerConfidence::TimedOut => Some(TIMED_OUT_DISCLOSURE.to_string()),
            _ => self.disclosure.clone(),
        };
        Answer {
            confidence,
            disclosure,
            ..self.clone()
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(disclosure) = &self.disclosure {
            out.push_str(&format!("NOTE: {disclosure}\n\n"));
        }
        if !self.summary.is_empty() {
            out.push_str(&self.summary);
            out.push_str("\n\n");
        }
        render_claims(&mut out, "Key findings", &self.findings);
        render_claims(&mut out, "Analysis", &self.analysis);
        if !self.gaps.is_empty() {
            out.push_str("Gaps:\n");
            for gap in &self.gaps {
                out.push_str(&format!("  - {gap}\n"));
            }
        }
        out.trim_end().to_string()
    }
}

fn render_claims(out: &mut String, title: &str, claims: &[Claim]) {
    if claims.is_empty() {
        return;
    }
    out.push_str(title);
    out.push_str(":\n");
    for claim in claims {
        let refs: String = claim.citations.iter().map(|i| format!("[{i}]")).collect();
        out.push_str(&format!("  - {} {}\n", claim.text, refs));
    }
    out.push('\n');
}
