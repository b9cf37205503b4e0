//! Markdown run reports.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use fathom_core::errors::FathomResult;
use fathom_core::models::{Claim, RunOutcome};

use crate::controller::RunResult;

/// Render `result` as a standalone Markdown document.
pub fn render_markdown(result: &RunResult) -> String {
    let mut md = String::new();
    let answer = &result.answer;
    let verdict = &result.verdict;

    let _ = writeln!(md, "# Research report\n");
    let _ = writeln!(md, "**Question:** {}\n", result.question.text());
    let _ = writeln!(md, "| | |\n|---|---|");
    let _ = writeln!(md, "| Run | `{}` |", result.trace.run_id);
    let _ = writeln!(
        md,
        "| Generated | {} |",
        result.trace.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(md, "| Outcome | {} |", result.outcome.as_str().to_uppercase());
    if let Some(c) = &result.classification {
        let _ = writeln!(md, "| Route | {:?} / {:?} / {} |", c.route, c.complexity, c.category.as_str());
    }
    let _ = writeln!(md, "| Rounds | {} |", result.trace.rounds);
    if result.outcome != RunOutcome::Direct {
        let _ = writeln!(md, "| Hallucination score | {:.2} |", verdict.hallucination_score);
        let _ = writeln!(md, "| Groundedness | {:.2} |", verdict.groundedness());
        let _ = writeln!(md, "| Complete | {} |", if verdict.complete { "yes" } else { "no" });
    }
    let usage = result.trace.total_usage();
    let _ = writeln!(
        md,
        "| Tokens | {} prompt / {} completion |",
        usage.prompt_tokens, usage.completion_tokens
    );
    let _ = writeln!(md, "| Elapsed | {} ms |\n", result.trace.total_elapsed_ms);

    if let Some(disclosure) = &answer.disclosure {
        let _ = writeln!(md, "> **Note:** {disclosure}\n");
    }

    if !answer.summary.is_empty() {
        let _ = writeln!(md, "## Summary\n\n{}\n", answer.summary);
    }
    claims_section(&mut md, "Key findings", &answer.findings);
    claims_section(&mut md, "Analysis", &answer.analysis);

    if !answer.gaps.is_empty() {
        let _ = writeln!(md, "## Gaps\n");
        for gap in &answer.gaps {
            let _ = writeln!(md, "- {gap}");
        }
        md.push('\n');
    }

    if !verdict.feedback.message.is_empty() && !verdict.is_accept() {
        let _ = writeln!(md, "## Evaluator feedback\n\n{}\n", verdict.feedback.render());
    }

    if !result.evidence.is_empty() {
        let _ = writeln!(md, "## Sources\n");
        let _ = writeln!(md, "| # | Publisher | Type | Date | Group | Document |");
        let _ = writeln!(md, "|---|---|---|---|---|---|");
        for (i, c) in result.evidence.iter().enumerate() {
            let m = &c.metadata;
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | `{}` |",
                i + 1,
                cell(m.publisher.as_deref()),
                cell(m.document_type.as_deref()),
                cell(m.date.as_deref()),
                cell(m.group.as_deref()),
                c.doc_id,
            );
        }
        md.push('\n');
    }

    if !result.trace.degradations.is_empty() {
        let _ = writeln!(md, "## Degradations\n");
        for d in &result.trace.degradations {
            let _ = writeln!(md, "- {}: {} (fell back to {})", d.component, d.failure, d.fallback_used);
        }
        md.push('\n');
    }

    md.trim_end().to_string() + "\n"
}

/// Write the report into `dir` as `report_<timestamp>.md`.
pub fn write_report(dir: &Path, result: &RunResult) -> FathomResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = format!(
        "report_{}.md",
        result.trace.started_at.format("%Y%m%d_%H%M%S_%3f")
    );
    let path = dir.join(name);
    std::fs::write(&path, render_markdown(result))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

fn claims_section(md: &mut String, title: &str, claims: &[Claim]) {
    if claims.is_empty() {
        return;
    }
    let _ = writeln!(md, "## {title}\n");
    for claim in claims {
        let refs: String = claim.citations.iter().map(|n| format!("[{n}]")).collect();
        let _ = writeln!(md, "- {} {refs}", claim.text);
    }
    md.push('\n');
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or("unknown").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use fathom_core::models::{
        Answer, AnswerConfidence, Candidate, CandidateKey, Claim, EvidenceSet, Feedback, Question,
        RunTrace, SourceMetadata, Verdict,
    };

    use super::*;

    fn result() -> RunResult {
        let evidence = EvidenceSet::new(vec![Candidate {
            key: CandidateKey::new("acme-10k", "p1"),
            doc_id: "acme-10k".into(),
            span: "p1".into(),
            text: "Revenue was $4.2 billion.".into(),
            metadata: SourceMetadata {
                publisher: Some("Acme | Corp".into()),
                date: Some("2024-02-15".into()),
                document_type: Some("10-K".into()),
                group: None,
            },
            semantic_score: 0.9,
            keyword_score: 0.5,
            fused_score: 0.78,
            base_score: 0.78,
            boosted: false,
        }]);
        let answer = Answer {
            summary: "Acme grew.".into(),
            findings: vec![Claim::new("Revenue was $4.2 billion", vec![1])],
            ..Answer::gaps_only(vec!["Q4 revenue".into()], &evidence, 2)
        }
        .annotated(AnswerConfidence::Unverified);
        RunResult {
            question: Question::new("How did Acme do?"),
            answer,
            verdict: Verdict::judged(0.1, false, 0.3, Feedback::new("Q4 missing", vec!["Q4 revenue".into()]), 2),
            outcome: RunOutcome::Exhausted,
            classification: None,
            sub_queries: Vec::new(),
            evidence,
            trace: RunTrace::new(),
        }
    }

    #[test]
    fn report_carries_answer_scores_and_sources() {
        let md = render_markdown(&result());
        assert!(md.starts_with("# Research report"));
        assert!(md.contains("| Outcome | EXHAUSTED |"));
        assert!(md.contains("| Groundedness | 0.90 |"));
        assert!(md.contains("- Revenue was $4.2 billion [1]"));
        assert!(md.contains("## Gaps"));
        assert!(md.contains("Missing: Q4 revenue"));
        assert!(md.contains("Acme \\| Corp"));
        assert!(md.contains("> **Note:**"));
    }

    #[test]
    fn report_file_is_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir.path().join("reports"), &result()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_") && name.ends_with(".md"));
        assert!(std::fs::read_to_string(path).unwrap().contains("How did Acme do?"));
    }
}
