use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The evaluator accepted an answer.
    Accepted,
    /// Rounds or the deadline ran out; the answer is low confidence.
    Exhausted,
    /// The question was answered without research.
    Direct,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Exhausted => "exhausted",
            Self::Direct => "direct",
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Routing,
    Planning,
    Retrieving,
    Fusing,
    Reranking,
    Synthesizing,
    Evaluating,
    Done(RunOutcome),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routing => f.write_str("ROUTING"),
            Self::Planning => f.write_str("PLANNING"),
            Self::Retrieving => f.write_str("RETRIEVING"),
            Self::Fusing => f.write_str("FUSING"),
            Self::Reranking => f.write_str("RERANKING"),
            Self::Synthesizing => f.write_str("SYNTHESIZING"),
            Self::Evaluating => f.write_str("EVALUATING"),
            Self::Done(outcome) => write!(f, "DONE({})", outcome.as_str().to_uppercase()),
        }
    }
}
