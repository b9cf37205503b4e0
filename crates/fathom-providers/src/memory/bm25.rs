//! Okapi BM25 over a fixed set of tokenized documents.

use std::collections::{HashMap, HashSet};

pub const K1: f64 = 1.5;
pub const B: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct Bm25 {
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avg_len: f64,
    doc_freq: HashMap<String, usize>,
}

impl Bm25 {
    pub fn new(docs: &[Vec<String>]) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freqs = Vec::with_capacity(docs.len());
        for tokens in docs {
            let mut tf: HashMap<String, usize> = HashMap::new();
            for t in tokens {
                *tf.entry(t.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(tf);
        }
        let doc_lens: Vec<usize> = docs.iter().map(Vec::len).collect();
        let total: usize = doc_lens.iter().sum();
        let avg_len = if docs.is_empty() {
            0.0
        } else {
            total as f64 / docs.len() as f64
        };
        Self {
            term_freqs,
            doc_lens,
            avg_len,
            doc_freq,
        }
    }

    /// Always non-negative.
    fn idf(&self, term: &str) -> f64 {
        let n = self.term_freqs.len() as f64;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Raw score of every document for `query`, in document order.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        let terms: HashSet<&String> = query.iter().collect();
        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(tf, &len)| {
                let norm = if self.avg_len > 0.0 {
                    1.0 - B + B * len as f64 / self.avg_len
                } else {
                    1.0
                };
                terms
                    .iter()
                    .filter_map(|t| tf.get(*t).map(|&f| (t, f as f64)))
                    .map(|(t, f)| self.idf(t) * f * (K1 + 1.0) / (f + K1 * norm))
                    .sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn matching_document_scores_highest() {
        let bm = Bm25::new(&[toks("revenue grew in q4"), toks("margin fell"), toks("q4 outlook")]);
        let s = bm.scores(&toks("q4 revenue"));
        assert!(s[0] > s[2]);
        assert!(s[2] > 0.0);
        assert_eq!(s[1], 0.0);
    }

    #[test]
    fn repeated_query_terms_count_once() {
        let bm = Bm25::new(&[toks("revenue"), toks("margin")]);
        assert_eq!(bm.scores(&toks("revenue revenue")), bm.scores(&toks("revenue")));
    }
}
