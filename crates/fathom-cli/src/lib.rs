//! # fathom-cli
//!
//! The `fathom` binary: `ask`, `classify`, `batch` and `config`.
//! Output goes to the writer handed in; logs go to stderr.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::io::Write;

use anyhow::Context;
use fathom_observability::tracing_setup::init_tracing;
use fathom_pipeline::PipelineController;
use fathom_providers::{index_from_config, model_from_config};

/// Resolve the config, build the providers and run the selected command.
pub async fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = cli
        .resolve_config()
        .context("failed to resolve configuration")?;
    init_tracing(&config.observability);

    if let Command::Config = cli.command {
        return commands::config::print(&config, out);
    }

    let index = index_from_config(&config).context("no usable index provider")?;
    let model = model_from_config(&config).context("no usable reasoning model")?;
    let controller = PipelineController::new(config, index, model)?;
    commands::dispatch(&cli, &controller, out).await
}
