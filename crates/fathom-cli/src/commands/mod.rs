//! Subcommand handlers.

pub mod ask;
pub mod batch;
pub mod classify;
pub mod config;

use std::io::Write;

use fathom_pipeline::PipelineController;

use crate::args::{Cli, Command};

/// Run a research command against an already built controller.
pub async fn dispatch(
    cli: &Cli,
    controller: &PipelineController,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match &cli.command {
        Command::Ask {
            question,
            conversation,
        } => ask::run(controller, question, conversation.as_deref(), cli.json, out).await,
        Command::Classify { question } => classify::run(controller, question, cli.json, out).await,
        Command::Batch { questions } => batch::run(controller, questions, cli.json, out).await,
        Command::Config => config::print(controller.config(), out),
    }
}
