//! Deterministic lexical groundedness check.
//!
//! A claim is supported when all its citations resolve, every figure it
//! states appears in the cited text, and enough of its content words do.

use std::collections::HashSet;
use std::sync::LazyLock;

use fathom_core::models::{Answer, Claim, EvidenceSet};
use regex::Regex;

/// Numbers (with thousands separators or decimals) and quarter tags.
static FIGURE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\bq[1-4]\b|\d+(?:[.,]\d+)*").ok());

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "was", "were", "are", "has", "have",
    "had", "its", "their", "which", "while", "than", "into", "over", "also", "been", "not",
    "but", "all", "per", "each", "year", "compared",
];

/// Why a claim failed the lexical check.
#[derive(Debug, Clone, PartialEq)]
pub enum Unsupported {
    UnresolvedCitation(usize),
    MissingFigure(String),
    LowOverlap(f64),
}

/// Lexical check result for a whole answer.
#[derive(Debug, Clone, Default)]
pub struct GroundingReport {
    /// Claims checked, plus one for a summary that states figures.
    pub checked: usize,
    /// (1-based claim number, reason). Claim 0 is the summary.
    pub unsupported: Vec<(usize, Unsupported)>,
}

impl GroundingReport {
    /// Share of checked statements without lexical support.
    pub fn hallucination(&self) -> f64 {
        if self.checked == 0 {
            return 0.0;
        }
        self.unsupported.len() as f64 / self.checked as f64
    }

    pub fn describe(&self) -> Option<String> {
        if self.unsupported.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .unsupported
            .iter()
            .map(|(n, why)| {
                let what = if *n == 0 {
                    "summary".to_string()
                } else {
                    format!("claim {n}")
                };
                match why {
                    Unsupported::UnresolvedCitation(i) => format!("{what} cites missing evidence [{i}]"),
                    Unsupported::MissingFigure(f) => format!("{what} states {f} which its sources do not"),
                    Unsupported::LowOverlap(o) => format!("{what} shares only {:.0}% of its wording with its sources", o * 100.0),
                }
            })
            .collect();
        Some(parts.join("; "))
    }
}

pub fn check_answer(answer: &Answer, evidence: &EvidenceSet, min_overlap: f64) -> GroundingReport {
    let mut report = GroundingReport::default();
    for (i, claim) in answer.claims().enumerate() {
        report.checked += 1;
        if let Some(why) = check_claim(claim, evidence, min_overlap) {
            report.unsupported.push((i + 1, why));
        }
    }

    let summary_figures = figures(&answer.summary);
    if !summary_figures.is_empty() {
        report.checked += 1;
        let known: HashSet<String> = evidence.iter().flat_map(|c| figures(&c.text)).collect();
        if let Some(f) = summary_figures.into_iter().find(|f| !known.contains(f)) {
            report.unsupported.push((0, Unsupported::MissingFigure(f)));
        }
    }
    report
}

fn check_claim(claim: &Claim, evidence: &EvidenceSet, min_overlap: f64) -> Option<Unsupported> {
    let mut cited = String::new();
    for &idx in &claim.citations {
        match evidence.cited(idx) {
            Some(c) => {
                cited.push_str(&c.text);
                cited.push(' ');
            }
            None => return Some(Unsupported::UnresolvedCitation(idx)),
        }
    }

    let cited_figures: HashSet<String> = figures(&cited).into_iter().collect();
    if let Some(f) = figures(&claim.text)
        .into_iter()
        .find(|f| !cited_figures.contains(f))
    {
        return Some(Unsupported::MissingFigure(f));
    }

    let claim_words = content_words(&claim.text);
    if claim_words.is_empty() {
        return None;
    }
    let cited_words = content_words(&cited);
    let shared = claim_words.iter().filter(|w| cited_words.contains(*w)).count();
    let overlap = shared as f64 / claim_words.len() as f64;
    (overlap < min_overlap).then_some(Unsupported::LowOverlap(overlap))
}

/// Figures in `text`, lowercased with thousands separators removed.
pub fn figures(text: &str) -> Vec<String> {
    let Some(re) = FIGURE_RE.as_ref() else {
        return Vec::new();
    };
    re.find_iter(text)
        .map(|m| normalize_figures(m.as_str()))
        .map(|f| f.trim_end_matches('.').to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

fn normalize_figures(text: &str) -> String {
    text.to_lowercase().replace(',', "")
}

fn content_words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}
