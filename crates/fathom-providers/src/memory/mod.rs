//! In-memory index over a JSON corpus.
//!
//! Keyword mode is BM25 (k1 1.5, b 0.75) normalised by the best score of
//! the query; semantic mode is the cosine of term-frequency vectors. Neither
//! needs an embedding model, which keeps local runs and tests hermetic.

mod bm25;
mod vector;

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use fathom_core::errors::{ConfigError, ProviderError};
use fathom_core::models::{SearchHit, SearchMode, SourceMetadata};
use fathom_core::traits::IIndexProvider;
use serde::{Deserialize, Serialize};

use bm25::Bm25;
use vector::{cosine, term_vector, TermVector};

/// One passage of a corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub doc_id: String,
    pub span: String,
    pub text: String,
    #[serde(default)]
    pub metadata: SourceMetadata,
}

/// Corpus file layout: `{"description": ..., "documents": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub description: Option<String>,
    pub documents: Vec<CorpusDocument>,
}

pub struct InMemoryIndex {
    documents: Vec<CorpusDocument>,
    bm25: Bm25,
    vectors: Vec<TermVector>,
}

impl InMemoryIndex {
    pub fn new(corpus: Corpus) -> Self {
        let tokens: Vec<Vec<String>> = corpus.documents.iter().map(|d| tokenize(&d.text)).collect();
        let vectors = tokens.iter().map(|t| term_vector(t)).collect();
        Self {
            bm25: Bm25::new(&tokens),
            vectors,
            documents: corpus.documents,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let corpus: Corpus = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: "<corpus>".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(corpus))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let corpus: Corpus = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), documents = corpus.documents.len(), "corpus loaded");
        Ok(Self::new(corpus))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Scored hits, best first. Documents that share no term with the
    /// query are left out.
    pub fn rank(&self, query: &str, mode: SearchMode, limit: usize) -> Vec<SearchHit> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        let scores: Vec<f64> = match mode {
            SearchMode::Keyword => {
                let raw = self.bm25.scores(&terms);
                let max = raw.iter().copied().fold(0.0, f64::max);
                if max > 0.0 {
                    raw.into_iter().map(|s| s / max).collect()
                } else {
                    raw
                }
            }
            SearchMode::Semantic => {
                let q = term_vector(&terms);
                self.vectors.iter().map(|d| cosine(&q, d)).collect()
            }
        };

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
            .into_iter()
            .map(|(i, score)| {
                let d = &self.documents[i];
                SearchHit {
                    doc_id: d.doc_id.clone(),
                    span: d.span.clone(),
                    text: d.text.clone(),
                    score,
                    metadata: d.metadata.clone(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl IIndexProvider for InMemoryIndex {
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        Ok(self.rank(query, mode, limit))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

/// Lowercased terms; dots survive inside numbers such as `4.2`.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '.'))
        .map(|w| w.trim_matches('.').to_lowercase())
        .filter(|w| !w.is_empty() && !is_stop_word(w))
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "a" | "an"
            | "the"
            | "and"
            | "or"
            | "of"
            | "in"
            | "on"
            | "at"
            | "to"
            | "for"
            | "by"
            | "with"
            | "from"
            | "as"
            | "is"
            | "was"
            | "were"
            | "are"
            | "what"
            | "how"
            | "did"
            | "its"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str) -> CorpusDocument {
        CorpusDocument {
            doc_id: id.into(),
            span: "p1".into(),
            text: text.into(),
            metadata: SourceMetadata::default(),
        }
    }

    fn index() -> InMemoryIndex {
        InMemoryIndex::new(Corpus {
            description: None,
            documents: vec![
                doc("a", "Company A revenue was $4.2 billion in 2023."),
                doc("b", "Company B revenue was $2.7 billion in 2023."),
                doc("c", "Unrelated weather report."),
            ],
        })
    }

    #[test]
    fn tokenizer_keeps_decimals() {
        assert_eq!(tokenize("Revenue: $4.2 billion."), vec!["revenue", "4.2", "billion"]);
    }

    #[test]
    fn keyword_scores_are_normalised_to_the_best_hit() {
        let hits = index().rank("Company A revenue 4.2", SearchMode::Keyword, 10);
        assert_eq!(hits[0].doc_id, "a");
        assert!((hits[0].score - 1.0).abs() < 1e-9);
        assert!(hits.iter().all(|h| h.doc_id != "c"));
    }

    #[test]
    fn semantic_scores_are_bounded() {
        let hits = index().rank("company b revenue 2023", SearchMode::Semantic, 10);
        assert_eq!(hits[0].doc_id, "b");
        assert!(hits.iter().all(|h| h.score > 0.0 && h.score <= 1.0));
    }

    #[test]
    fn limit_and_empty_queries() {
        assert_eq!(index().rank("revenue", SearchMode::Keyword, 1).len(), 1);
        assert!(index().rank("the of", SearchMode::Keyword, 10).is_empty());
    }
}
