//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fathom_core::config::{CliOverrides, FathomConfig};
use fathom_core::errors::ConfigError;

/// Fathom - cited answers to financial research questions
#[derive(Debug, Parser)]
#[command(name = "fathom")]
#[command(version)]
#[command(about = "Answer financial research questions from filings and news, with citations")]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML config file. Defaults and FATHOM_* variables apply without one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON corpus for the in-memory index.
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    /// Research rounds including the first.
    #[arg(long, global = true)]
    pub max_rounds: Option<u32>,

    /// Evidence passages handed to the synthesiser.
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Wall-clock budget per run, in milliseconds.
    #[arg(long, global = true)]
    pub deadline_ms: Option<u64>,

    /// Write a Markdown report per run into this directory.
    #[arg(long, global = true)]
    pub report_dir: Option<String>,

    /// Reasoning model name.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Research a question and print the cited answer
    Ask {
        question: String,
        /// Conversation the question belongs to.
        #[arg(long)]
        conversation: Option<String>,
    },
    /// Print the routing decision for a question without researching it
    Classify { question: String },
    /// Run every question of a JSONL file and print aggregate metrics
    Batch { questions: PathBuf },
    /// Print the resolved configuration as TOML
    Config,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_rounds: self.max_rounds,
            top_k: self.top_k,
            outer_deadline_ms: self.deadline_ms,
            corpus_path: self.corpus.clone(),
            report_dir: self.report_dir.clone(),
            model_name: self.model.clone(),
        }
    }

    /// Defaults, then the config file, then `FATHOM_*`, then flags.
    pub fn resolve_config(&self) -> Result<FathomConfig, ConfigError> {
        FathomConfig::load(self.config.as_deref(), Some(&self.overrides()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "fathom",
            "ask",
            "How did Company A do?",
            "--max-rounds",
            "3",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.overrides().max_rounds, Some(3));
        assert!(matches!(cli.command, Command::Ask { ref question, .. } if question == "How did Company A do?"));
    }

    #[test]
    fn flags_map_onto_overrides() {
        let cli = Cli::try_parse_from([
            "fathom",
            "--corpus",
            "corpus.json",
            "--deadline-ms",
            "5000",
            "--model",
            "qwen2.5:7b",
            "config",
        ])
        .unwrap();
        let o = cli.overrides();
        assert_eq!(o.corpus_path.as_deref(), Some("corpus.json"));
        assert_eq!(o.outer_deadline_ms, Some(5000));
        assert_eq!(o.model_name.as_deref(), Some("qwen2.5:7b"));
        assert!(o.top_k.is_none());
    }

    #[test]
    fn question_is_required() {
        assert!(Cli::try_parse_from(["fathom", "ask"]).is_err());
    }
}
