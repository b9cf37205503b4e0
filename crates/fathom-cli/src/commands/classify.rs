use std::io::Write;

use fathom_core::models::Question;
use fathom_pipeline::PipelineController;

pub async fn run(
    controller: &PipelineController,
    question: &str,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let c = controller.classify(&Question::new(question)).await;
    if json {
        writeln!(out, "{}", serde_json::to_string(&c)?)?;
    } else {
        writeln!(
            out,
            "route: {:?}\ncomplexity: {:?}\ncategory: {}{}",
            c.route,
            c.complexity,
            c.category.as_str(),
            if c.degraded { "\n(fallback classification)" } else { "" }
        )?;
    }
    Ok(())
}
