use std::io::Write;
use std::path::Path;

use fathom_core::models::{Question, RunOutcome};
use fathom_pipeline::report::write_report;
use fathom_pipeline::{PipelineController, RunResult};

pub async fn run(
    controller: &PipelineController,
    question: &str,
    conversation: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut question = Question::new(question);
    if let Some(id) = conversation {
        question = question.with_conversation(id);
    }
    let result = controller.run(question).await?;

    let report = match &controller.config().observability.report_dir {
        Some(dir) => Some(write_report(Path::new(dir), &result)?),
        None => None,
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        return Ok(());
    }
    write!(out, "{}", render(&result))?;
    if let Some(path) = report {
        writeln!(out, "\nReport: {}", path.display())?;
    }
    Ok(())
}

/// Terminal rendering: the answer, a status line and the cited sources.
pub fn render(result: &RunResult) -> String {
    let mut text = result.answer.render_text();
    text.push_str("\n\n");
    let status = match result.outcome {
        RunOutcome::Direct => format!("[{}]", result.outcome.as_str().to_uppercase()),
        _ => format!(
            "[{} | rounds {} | groundedness {:.2}]",
            result.outcome.as_str().to_uppercase(),
            result.trace.rounds,
            result.verdict.groundedness()
        ),
    };
    text.push_str(&status);
    text.push('\n');

    let cited = result.answer.cited_indices();
    if !cited.is_empty() {
        text.push_str("\nSources:\n");
        for n in cited {
            if let Some(c) = result.evidence.cited(n) {
                text.push_str(&format!("  [{n}] {} ({})\n", c.metadata.label(), c.doc_id));
            }
        }
    }
    text
}
