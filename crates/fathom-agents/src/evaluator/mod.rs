//! Answer evaluator: groundedness and completeness into an ACCEPT/REJECT
//! verdict with structured feedback for the planner.

pub mod grounding;

use fathom_core::config::{AgentConfig, EvaluationConfig};
use fathom_core::models::{
    Answer, DegradationEvent, EvidenceSet, Feedback, Question, Stage, StageOutput, StageUsage,
    Verdict,
};
use fathom_core::resilience::RunDeadline;
use serde::Deserialize;

use crate::prompts;
use crate::reasoning::ReasoningClient;

#[derive(Debug, Deserialize)]
struct EvaluationReply {
    hallucination_score: f64,
    complete: bool,
    #[serde(default)]
    missing: Vec<String>,
    #[serde(default)]
    feedback: String,
}

pub struct AnswerEvaluator {
    client: ReasoningClient,
    temperature: f64,
    reject_threshold: f64,
    min_claim_overlap: f64,
}

impl AnswerEvaluator {
    pub fn new(client: ReasoningClient, agents: &AgentConfig, evaluation: &EvaluationConfig) -> Self {
        Self {
            client,
            temperature: agents.temperatures.evaluator,
            reject_threshold: evaluation.reject_threshold,
            min_claim_overlap: evaluation.min_claim_overlap,
        }
    }

    /// Judge `answer` against the evidence it was synthesised from.
    pub async fn evaluate(
        &self,
        question: &Question,
        answer: &Answer,
        evidence: &EvidenceSet,
        round: u32,
        deadline: RunDeadline,
    ) -> StageOutput<Verdict> {
        if evidence.is_empty() || !answer.has_claims() {
            let message = if evidence.is_empty() {
                "no supporting evidence was retrieved for the question"
            } else {
                "the answer makes no cited claims"
            };
            let missing = if answer.gaps.is_empty() {
                vec![question.text().to_string()]
            } else {
                answer.gaps.clone()
            };
            return StageOutput::new(
                Verdict::no_evidence(message, missing, round),
                StageUsage::default(),
            );
        }

        let lexical = grounding::check_answer(answer, evidence, self.min_claim_overlap);
        let body = prompts::evaluate(question, answer, evidence);
        let reply = self
            .client
            .complete_json::<EvaluationReply>(Stage::Evaluating, &body, self.temperature, deadline)
            .await;

        match reply.result {
            Ok(judged) if judged.hallucination_score.is_finite() => {
                let model_h = judged.hallucination_score.clamp(0.0, 1.0);
                let h = model_h.max(lexical.hallucination());
                let mut message = judged.feedback.trim().to_string();
                if let Some(detail) = lexical.describe() {
                    if !message.is_empty() {
                        message.push(' ');
                    }
                    message.push_str(&format!("Unsupported statements: {detail}."));
                }
                if message.is_empty() && !judged.missing.is_empty() {
                    message = format!("The answer does not cover: {}", judged.missing.join("; "));
                }
                tracing::debug!(
                    model_hallucination = model_h,
                    lexical_hallucination = lexical.hallucination(),
                    complete = judged.complete,
                    "answer judged"
                );
                let verdict = Verdict::judged(
                    h,
                    judged.complete,
                    self.reject_threshold,
                    Feedback::new(message, clean(judged.missing)),
                    round,
                );
                StageOutput::new(verdict, reply.usage)
            }
            Ok(_) => self.unverified("hallucination score is not a number", round, reply.usage),
            Err(e) => self.unverified(&e.to_string(), round, reply.usage),
        }
    }

    fn unverified(&self, reason: &str, round: u32, usage: StageUsage) -> StageOutput<Verdict> {
        StageOutput::new(Verdict::unable_to_verify(reason, round), usage).degraded(
            DegradationEvent::new(Stage::Evaluating, reason, "reject as unable to verify"),
        )
    }
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
