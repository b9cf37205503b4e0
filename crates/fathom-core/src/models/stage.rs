use serde::{Deserialize, Serialize};

use super::degradation_event::DegradationEvent;
use super::trace::StageUsage;

/// A unit of work in the pipeline. Reasoning stages tag their prompts with
/// `marker()` so transcripts and test doubles can tell calls apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Routing,
    Direct,
    Planning,
    Retrieving,
    Fusing,
    Reranking,
    Synthesizing,
    Evaluating,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routing => "routing",
            Self::Direct => "direct",
            Self::Planning => "planning",
            Self::Retrieving => "retrieving",
            Self::Fusing => "fusing",
            Self::Reranking => "reranking",
            Self::Synthesizing => "synthesizing",
            Self::Evaluating => "evaluating",
        }
    }

    /// First line of every prompt issued by this stage.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Routing => "[fathom:route]",
            Self::Direct => "[fathom:direct]",
            Self::Planning => "[fathom:plan]",
            Self::Retrieving => "[fathom:retrieve]",
            Self::Fusing => "[fathom:fuse]",
            Self::Reranking => "[fathom:rerank]",
            Self::Synthesizing => "[fathom:synthesize]",
            Self::Evaluating => "[fathom:evaluate]",
        }
    }

    /// Recover the stage from a prompt's marker line.
    pub fn from_prompt(prompt: &str) -> Option<Stage> {
        const ALL: [Stage; 8] = [
            Stage::Routing,
            Stage::Direct,
            Stage::Planning,
            Stage::Retrieving,
            Stage::Fusing,
            Stage::Reranking,
            Stage::Synthesizing,
            Stage::Evaluating,
        ];
        let head = prompt.trim_start();
        ALL.into_iter().find(|s| head.starts_with(s.marker()))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value produced by a stage plus what it cost and any fallback it took.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub usage: StageUsage,
    pub degradations: Vec<DegradationEvent>,
}

impl<T> StageOutput<T> {
    pub fn new(value: T, usage: StageUsage) -> Self {
        Self {
            value,
            usage,
            degradations: Vec::new(),
        }
    }

    pub fn degraded(mut self, event: DegradationEvent) -> Self {
        self.degradations.push(event);
        self
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
