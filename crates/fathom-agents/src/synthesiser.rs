//! Answer synthesiser: a structured, cited answer built only from the
//! evidence set handed to it.

use fathom_core::config::AgentConfig;
use fathom_core::models::{
    Answer, AnswerConfidence, Claim, DegradationEvent, EvidenceSet, Question, Stage, StageOutput,
    StageUsage,
};
use fathom_core::resilience::RunDeadline;
use serde::Deserialize;

use crate::prompts;
use crate::reasoning::ReasoningClient;

#[derive(Debug, Deserialize)]
struct ClaimReply {
    text: String,
    #[serde(default)]
    citations: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct SynthesisReply {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    findings: Vec<ClaimReply>,
    #[serde(default)]
    analysis: Vec<ClaimReply>,
    #[serde(default)]
    gaps: Vec<String>,
}

pub struct AnswerSynthesiser {
    client: ReasoningClient,
    temperature: f64,
}

impl AnswerSynthesiser {
    pub fn new(client: ReasoningClient, config: &AgentConfig) -> Self {
        Self {
            client,
            temperature: config.temperatures.synthesiser,
        }
    }

    /// Synthesize an answer bound to `evidence`. Empty evidence yields a
    /// gaps-only answer without a model call.
    pub async fn synthesize(
        &self,
        question: &Question,
        evidence: &EvidenceSet,
        round: u32,
        deadline: RunDeadline,
    ) -> StageOutput<Answer> {
        if evidence.is_empty() {
            let gap = format!("No evidence was found for: {}", question.text());
            return StageOutput::new(
                Answer::gaps_only(vec![gap], evidence, round),
                StageUsage::default(),
            );
        }

        let body = prompts::synthesize(question, evidence);
        let reply = self
            .client
            .complete_json::<SynthesisReply>(Stage::Synthesizing, &body, self.temperature, deadline)
            .await;

        match reply.result {
            Ok(parsed) => StageOutput::new(build_answer(parsed, evidence, round), reply.usage),
            Err(e) => {
                let gap = format!("Synthesis failed, no answer could be composed: {e}");
                StageOutput::new(Answer::gaps_only(vec![gap], evidence, round), reply.usage)
                    .degraded(DegradationEvent::new(
                        Stage::Synthesizing,
                        e.to_string(),
                        "gaps-only answer",
                    ))
            }
        }
    }
}

fn build_answer(reply: SynthesisReply, evidence: &EvidenceSet, round: u32) -> Answer {
    let mut dropped = 0usize;
    let mut keep = |claims: Vec<ClaimReply>| -> Vec<Claim> {
        claims
            .into_iter()
            .filter_map(|c| {
                let text = c.text.trim();
                if text.is_empty() {
                    return None;
                }
                if c.citations.is_empty() {
                    dropped += 1;
                    return None;
                }
                Some(Claim::new(text, c.citations))
            })
            .collect()
    };
    let findings = keep(reply.findings);
    let analysis = keep(reply.analysis);
    if dropped > 0 {
        tracing::info!(dropped, "dropped uncited claims from synthesis");
    }

    Answer {
        summary: reply.summary.trim().to_string(),
        findings,
        analysis,
        gaps: reply
            .gaps
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect(),
        evidence_digest: evidence.digest().to_string(),
        confidence: AnswerConfidence::Pending,
        disclosure: None,
        round,
    }
}
