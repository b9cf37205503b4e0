use serde::{Deserialize, Serialize};

use crate::constants::{CITATION_INTEGRITY_FAILURE, UNABLE_TO_VERIFY};
use crate::errors::ContractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Reject,
}

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictBasis {
    ModelJudged,
    CitationIntegrityFailure,
    UnableToVerify,
    NoEvidence,
    DirectRoute,
    DeadlineExceeded,
}

/// Structured evaluator feedback, consumed verbatim by the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    /// Aspects of the question the answer did not cover.
    #[serde(default)]
    pub missing: Vec<String>,
}

impl Feedback {
    pub fn new(message: impl Into<String>, missing: Vec<String>) -> Self {
        Self {
            message: message.into(),
            missing,
        }
    }

    /// Message plus missing items as one block of text for prompts.
    pub fn render(&self) -> String {
        if self.missing.is_empty() {
            return self.message.clone();
        }
        format!("{}\nMissing: {}", self.message, self.missing.join("; "))
    }

    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.render().to_lowercase().contains(&needle)
    }
}

/// Evaluator decision for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    /// Share of unsupported content, [0.0, 1.0].
    pub hallucination_score: f64,
    pub complete: bool,
    pub feedback: Feedback,
    pub round: u32,
    pub basis: VerdictBasis,
}

impl Verdict {
    /// ACCEPT iff `hallucination_score < threshold` and the answer is complete.
    pub fn judged(
        hallucination_score: f64,
        complete: bool,
        threshold: f64,
        feedback: Feedback,
        round: u32,
    ) -> Self {
        let h = hallucination_score.clamp(0.0, 1.0);
        let decision = if h < threshold && complete {
            Decision::Accept
        } else {
            Decision::Reject
        };
        Self {
            decision,
            hallucination_score: h,
            complete,
            feedback,
            round,
            basis: VerdictBasis::ModelJudged,
        }
    }

    pub fn citation_integrity_failure(error: &ContractError, round: u32) -> Self {
        Self::rejected(
            1.0,
            Feedback::new(format!("{CITATION_INTEGRITY_FAILURE}: {error}"), Vec::new()),
            round,
            VerdictBasis::CitationIntegrityFailure,
        )
    }

    pub fn unable_to_verify(reason: &str, round: u32) -> Self {
        Self::rejected(
            1.0,
            Feedback::new(format!("{UNABLE_TO_VERIFY}: {reason}"), Vec::new()),
            round,
            VerdictBasis::UnableToVerify,
        )
    }

    /// Incomplete verdict issued without consulting the model.
    pub fn no_evidence(message: impl Into<String>, missing: Vec<String>, round: u32) -> Self {
        Self::rejected(
            0.0,
            Feedback::new(message, missing),
            round,
            VerdictBasis::NoEvidence,
        )
    }

    pub fn direct() -> Self {
        Self {
            decision: Decision::Accept,
            hallucination_score: 0.0,
            complete: true,
            feedback: Feedback::default(),
            round: 0,
            basis: VerdictBasis::DirectRoute,
        }
    }

    pub fn deadline_exceeded(round: u32) -> Self {
        Self::rejected(
            1.0,
            Feedback::new("run deadline exceeded before evaluation", Vec::new()),
            round,
            VerdictBasis::DeadlineExceeded,
        )
    }

    fn rejected(h: f64, feedback: Feedback, round: u32, basis: VerdictBasis) -> Self {
        Self {
            decision: Decision::Reject,
            hallucination_score: h,
            complete: false,
            feedback,
            round,
            basis,
        }
    }

    pub fn groundedness(&self) -> f64 {
        1.0 - self.hallucination_score
    }

    pub fn is_accept(&self) -> bool {
        self.decision == Decision::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_grounded_and_complete() {
        let fb = Feedback::default();
        assert!(Verdict::judged(0.1, true, 0.3, fb.clone(), 1).is_accept());
        assert!(!Verdict::judged(0.3, true, 0.3, fb.clone(), 1).is_accept());
        assert!(!Verdict::judged(0.0, false, 0.3, fb, 1).is_accept());
    }

    #[test]
    fn groundedness_complements_hallucination() {
        let v = Verdict::judged(0.25, true, 0.3, Feedback::default(), 1);
        assert!((v.groundedness() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn integrity_failure_feedback_is_prefixed() {
        let v = Verdict::citation_integrity_failure(&ContractError::UncitedClaim { claim: 2 }, 1);
        assert_eq!(v.decision, Decision::Reject);
        assert!(v.feedback.message.starts_with(CITATION_INTEGRITY_FAILURE));
    }

    #[test]
    fn feedback_render_lists_missing() {
        let fb = Feedback::new("incomplete", vec!["Q4 revenue".into()]);
        assert_eq!(fb.render(), "incomplete\nMissing: Q4 revenue");
        assert!(fb.mentions("q4"));
    }
}
