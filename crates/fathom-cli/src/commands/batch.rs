//! Batch validation: every question of a JSONL file through the pipeline,
//! one after another, folded into `RunMetrics` and checked against the
//! configured acceptance criteria. A failed criterion fails the command.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use fathom_core::models::Question;
use fathom_observability::metrics::expected_coverage;
use fathom_observability::{RunMetrics, RunScore};
use fathom_pipeline::report::write_report;
use fathom_pipeline::PipelineController;
use serde::Deserialize;

/// One line of the questions file.
#[derive(Debug, Deserialize)]
pub struct BatchItem {
    pub question: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Strings the answer must contain, matched case-insensitively.
    #[serde(default)]
    pub expected_contains: Vec<String>,
}

impl BatchItem {
    fn to_question(&self) -> Question {
        let question = Question::new(self.question.clone());
        match &self.conversation_id {
            Some(id) => question.with_conversation(id.clone()),
            None => question,
        }
    }
}

/// Parse a JSONL questions file. Blank lines are skipped.
pub fn read_questions(path: &Path) -> anyhow::Result<Vec<BatchItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read questions file {}", path.display()))?;
    parse_questions(&content).with_context(|| format!("in {}", path.display()))
}

pub fn parse_questions(content: &str) -> anyhow::Result<Vec<BatchItem>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {} is not a question object", i + 1))
        })
        .collect()
}

pub async fn run(
    controller: &PipelineController,
    path: &Path,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let items = read_questions(path)?;
    tracing::info!(questions = items.len(), path = %path.display(), "batch started");
    let report_dir = controller.config().observability.report_dir.clone();

    let mut metrics = RunMetrics::new();
    for (i, item) in items.iter().enumerate() {
        let result = controller.run(item.to_question()).await?;
        let coverage = expected_coverage(&result.answer.render_text(), &item.expected_contains);
        let score = RunScore::assess(result.outcome, &result.verdict, coverage);
        metrics.record(
            &result.trace,
            result.outcome,
            &result.verdict,
            result.classification.as_ref().map(|c| c.category),
            score,
        );
        if let Some(dir) = &report_dir {
            write_report(Path::new(dir), &result)?;
        }
        if !json {
            writeln!(
                out,
                "{:>3}. {:<9} {} rounds={} quality={:.2} {}",
                i + 1,
                result.outcome.as_str().to_uppercase(),
                if score.passed { "pass" } else { "FAIL" },
                result.trace.rounds,
                score.quality,
                result.question.text()
            )?;
        }
    }

    let validation = metrics.validate(&controller.config().validation);
    let mut summary = metrics.summary();
    summary["validation"] = serde_json::to_value(&validation)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    if !json {
        for c in &validation.criteria {
            writeln!(
                out,
                "{:<20} {:>10.3} (threshold {:.3}) {}",
                c.name,
                c.actual,
                c.threshold,
                if c.passed { "ok" } else { "FAILED" }
            )?;
        }
    }

    if !validation.passed {
        anyhow::bail!("validation failed: {}", validation.failures().join("; "));
    }
    Ok(())
}
