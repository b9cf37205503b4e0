use serde::{Deserialize, Serialize};

/// Retrieval method of an index query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Semantic,
    Keyword,
}

impl SearchMode {
    pub const ALL: [SearchMode; 2] = [SearchMode::Semantic, SearchMode::Keyword];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
        }
    }
}

/// Provenance of a passage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMetadata {
    pub publisher: Option<String>,
    /// Publication or filing date as provided by the index.
    pub date: Option<String>,
    /// e.g. `10-K`, `news`, `wiki`.
    pub document_type: Option<String>,
    /// Coverage group (usually the issuing entity) used for fairness boosting.
    pub group: Option<String>,
}

impl SourceMetadata {
    /// One-line `publisher | type | date | group` label for prompts and reports.
    pub fn label(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());
        format!(
            "{} | {} | {} | {}",
            field(&self.publisher),
            field(&self.document_type),
            field(&self.date),
            field(&self.group)
        )
    }
}

/// One scored passage as returned by the index provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: String,
    /// Identifier of the passage inside the document.
    pub span: String,
    pub text: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: SourceMetadata,
}

impl SearchHit {
    pub fn key(&self) -> CandidateKey {
        CandidateKey::new(&self.doc_id, &self.span)
    }
}

/// Identity of a passage: document id plus a blake3 hash of the span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateKey {
    pub doc_id: String,
    pub span_hash: String,
}

impl CandidateKey {
    pub fn new(doc_id: &str, span: &str) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            span_hash: blake3::hash(span.as_bytes()).to_hex().to_string(),
        }
    }
}

impl std::fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.doc_id, &self.span_hash[..12.min(self.span_hash.len())])
    }
}

/// A deduplicated passage with both retrieval scores and the fused score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub key: CandidateKey,
    pub doc_id: String,
    pub span: String,
    pub text: String,
    pub metadata: SourceMetadata,
    /// Normalized semantic score [0.0, 1.0]; 0.0 when the method missed it.
    pub semantic_score: f64,
    /// Normalized keyword score [0.0, 1.0]; 0.0 when the method missed it.
    pub keyword_score: f64,
    /// Weighted fusion of both scores, after any fairness boost.
    pub fused_score: f64,
    /// Fused score before the fairness boost.
    pub base_score: f64,
    /// Whether the fairness boost has been applied.
    pub boosted: bool,
}

impl Candidate {
    pub fn group(&self) -> Option<&str> {
        self.metadata.group.as_deref()
    }

    /// Copy of this candidate with the fairness boost applied once.
    ///
    /// A candidate that is already boosted is returned unchanged. With a cap,
    /// the boosted score never exceeds `max(base, cap)`.
    pub fn boosted_by(&self, factor: f64, cap: Option<f64>) -> Candidate {
        if self.boosted {
            return self.clone();
        }
        let mut raised = self.fused_score * factor;
        if let Some(cap) = cap {
            raised = raised.min(cap.max(self.fused_score));
        }
        Candidate {
            fused_score: raised,
            boosted: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(score: f64) -> Candidate {
        Candidate {
            key: CandidateKey::new("doc", "p1"),
            doc_id: "doc".into(),
            span: "p1".into(),
            text: "text".into(),
            metadata: SourceMetadata::default(),
            semantic_score: score,
            keyword_score: 0.0,
            fused_score: score,
            base_score: score,
            boosted: false,
        }
    }

    #[test]
    fn same_doc_and_span_share_a_key() {
        assert_eq!(CandidateKey::new("a", "p1"), CandidateKey::new("a", "p1"));
        assert_ne!(CandidateKey::new("a", "p1"), CandidateKey::new("a", "p2"));
        assert_ne!(CandidateKey::new("a", "p1"), CandidateKey::new("b", "p1"));
    }

    #[test]
    fn boost_applies_once() {
        let c = candidate(0.5).boosted_by(1.1, None);
        assert!((c.fused_score - 0.55).abs() < 1e-9);
        let again = c.boosted_by(1.1, None);
        assert!((again.fused_score - 0.55).abs() < 1e-9);
        assert!((again.base_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn boost_cap_limits_but_never_lowers() {
        let capped = candidate(0.5).boosted_by(2.0, Some(0.6));
        assert!((capped.fused_score - 0.6).abs() < 1e-9);
        let above_cap = candidate(0.7).boosted_by(2.0, Some(0.6));
        assert!((above_cap.fused_score - 0.7).abs() < 1e-9);
    }
}
