use std::sync::Arc;

use fathom_agents::{
    AnswerEvaluator, AnswerSynthesiser, IntentOrchestrator, QueryPlanner, ReasoningClient,
};
use fathom_core::config::FathomConfig;
use fathom_core::constants::UNABLE_TO_VERIFY;
use fathom_core::errors::ProviderError;
use fathom_core::models::{
    Answer, Candidate, CandidateKey, Claim, Decision, EvidenceSet, Feedback, Question, Route,
    SourceMetadata, Stage, SubQuery, SubQueryOrigin, VerdictBasis,
};
use fathom_core::resilience::RunDeadline;
use fathom_tokens::TokenCounter;
use serde_json::json;
use test_fixtures::ScriptedModel;

fn client(model: &Arc<ScriptedModel>) -> ReasoningClient {
    let config = FathomConfig::default();
    ReasoningClient::new(model.clone(), config.agents.model_policy(), TokenCounter::default())
}

fn evidence() -> EvidenceSet {
    let docs = [
        ("acme", "Company A", "Company A reported revenue of $4.2 billion for fiscal 2023."),
        ("bolt", "Company B", "Company B recorded revenue of $2.7 billion in fiscal 2023."),
    ];
    EvidenceSet::new(
        docs.iter()
            .map(|(doc, group, text)| Candidate {
                key: CandidateKey::new(doc, "p1"),
                doc_id: doc.to_string(),
                span: "p1".into(),
                text: text.to_string(),
                metadata: SourceMetadata {
                    publisher: Some(group.to_string()),
                    document_type: Some("10-K".into()),
                    date: Some("2024-02-15".into()),
                    group: Some(group.to_string()),
                },
                semantic_score: 0.8,
                keyword_score: 0.6,
                fused_score: 0.74,
                base_score: 0.74,
                boosted: false,
            })
            .collect(),
    )
}

// --- Reasoning client ---

#[tokio::test]
async fn reply_usage_counts_prompt_and_completion() {
    let model = Arc::new(ScriptedModel::new().reply(Stage::Routing, "route this question to research"));
    let counter = TokenCounter::default();
    let reply = client(&model)
        .complete(Stage::Routing, "Classify: What is EBITDA?", 0.0, RunDeadline::unbounded())
        .await;

    let prompt = &model.prompts(Stage::Routing)[0];
    assert_eq!(reply.usage.model_calls, 1);
    assert_eq!(reply.usage.failed_calls, 0);
    assert_eq!(reply.usage.prompt_tokens, counter.count(prompt));
    assert_eq!(
        reply.usage.completion_tokens,
        counter.count("route this question to research")
    );
}

#[tokio::test]
async fn failed_call_has_no_completion_tokens() {
    let model = Arc::new(ScriptedModel::new().fail(
        Stage::Routing,
        ProviderError::MalformedOutput {
            stage: "routing".into(),
            reason: "garbage".into(),
        },
    ));
    let reply = client(&model)
        .complete(Stage::Routing, "Classify: What is EBITDA?", 0.0, RunDeadline::unbounded())
        .await;
    assert!(reply.result.is_err());
    assert_eq!(reply.usage.failed_calls, 1);
    assert!(reply.usage.prompt_tokens > 0);
    assert_eq!(reply.usage.completion_tokens, 0);
}

// --- Orchestrator ---

#[tokio::test]
async fn classification_is_cached_per_normalized_question() {
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Routing,
        json!({"route": "DIRECT", "complexity": "SIMPLE", "category": "financial"}),
    ));
    let config = FathomConfig::default();
    let orchestrator = IntentOrchestrator::new(client(&model), &config.agents);

    let first = orchestrator
        .classify(&Question::new("What is EBITDA?"), RunDeadline::unbounded())
        .await;
    let second = orchestrator
        .classify(&Question::new("  what is   ebitda? "), RunDeadline::unbounded())
        .await;

    assert_eq!(first.value.route, Route::Direct);
    assert_eq!(second.value, first.value);
    assert_eq!(model.calls(Stage::Routing), 1);
    assert_eq!(second.usage.model_calls, 0);
}

#[tokio::test]
async fn unparseable_classification_falls_back_to_research() {
    let model = Arc::new(ScriptedModel::new().reply(Stage::Routing, "It is probably a research question."));
    let config = FathomConfig::default();
    let orchestrator = IntentOrchestrator::new(client(&model), &config.agents);

    let out = orchestrator
        .classify(&Question::new("Compare revenue"), RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.route, Route::Research);
    assert!(out.value.degraded);
    assert_eq!(out.degradations[0].component, "routing");
}

#[tokio::test]
async fn direct_answer_has_no_citations() {
    let model = Arc::new(ScriptedModel::new().reply(
        Stage::Direct,
        "EBITDA is earnings before interest, taxes, depreciation and amortization.",
    ));
    let config = FathomConfig::default();
    let orchestrator = IntentOrchestrator::new(client(&model), &config.agents);

    let out = orchestrator
        .answer_directly(&Question::new("What is EBITDA?"), RunDeadline::unbounded())
        .await;
    let answer = out.value.expect("direct answer");
    assert!(answer.summary.starts_with("EBITDA is"));
    assert!(!answer.has_claims());
}

#[tokio::test(start_paused = true)]
async fn failed_direct_answer_asks_for_research() {
    let model = Arc::new(ScriptedModel::new());
    let config = FathomConfig::default();
    let orchestrator = IntentOrchestrator::new(client(&model), &config.agents);

    let out = orchestrator
        .answer_directly(&Question::new("What is EBITDA?"), RunDeadline::unbounded())
        .await;
    assert!(out.value.is_none());
    assert!(out.is_degraded());
}

// --- Planner ---

#[tokio::test]
async fn first_round_uses_model_queries() {
    let model = Arc::new(ScriptedModel::new().reply(
        Stage::Planning,
        "```json\n{\"sub_queries\": [\"Company A revenue 2023\", \"Company B revenue 2023\", \"Company A vs Company B growth\"]}\n```",
    ));
    let config = FathomConfig::default();
    let planner = QueryPlanner::new(client(&model), &config.agents);

    let out = planner
        .plan(&Question::new("Compare Company A and Company B revenue"), None, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.len(), 3);
    assert!(out.value.iter().all(|q| q.origin == SubQueryOrigin::Planned && q.round == 1));
}

#[tokio::test]
async fn retry_targets_reported_gaps_and_changes_the_set() {
    let question = Question::new("Company A quarterly revenue in 2023");
    let prior = vec![
        SubQuery::planned("Company A Q1 2023 revenue", 1),
        SubQuery::planned("Company A Q2 2023 revenue", 1),
        SubQuery::planned("Company A Q3 2023 revenue", 1),
    ];
    let feedback = Feedback::new("Q4 revenue is not covered", vec!["Q4 revenue".into()]);
    // The model stubbornly repeats itself.
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Planning,
        json!({"sub_queries": ["Company A Q1 2023 revenue", "Company A Q2 2023 revenue", "Company A Q3 2023 revenue"]}),
    ));
    let config = FathomConfig::default();
    let planner = QueryPlanner::new(client(&model), &config.agents);

    let out = planner
        .plan(&question, Some((&prior, &feedback)), 2, RunDeadline::unbounded())
        .await;
    assert!(out.value.iter().any(|q| q.mentions("Q4")));
    assert_ne!(
        out.value.iter().map(|q| q.text.clone()).collect::<Vec<_>>(),
        prior.iter().map(|q| q.text.clone()).collect::<Vec<_>>()
    );
    // Feedback reached the prompt verbatim.
    assert!(model.prompts(Stage::Planning)[0].contains("Q4 revenue is not covered"));
}

#[tokio::test]
async fn planner_failure_falls_back_to_question() {
    let model = Arc::new(ScriptedModel::new().reply(Stage::Planning, "{\"sub_queries\": []}"));
    let config = FathomConfig::default();
    let planner = QueryPlanner::new(client(&model), &config.agents);

    let question = Question::new("Company A revenue");
    let out = planner.plan(&question, None, 1, RunDeadline::unbounded()).await;
    assert_eq!(out.value.len(), 1);
    assert_eq!(out.value[0].text, question.text());
    assert_eq!(out.value[0].origin, SubQueryOrigin::Fallback);
    assert!(out.is_degraded());
}

// --- Synthesiser ---

#[tokio::test]
async fn synthesis_drops_uncited_claims() {
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Synthesizing,
        json!({
            "summary": "Company A out-earned Company B.",
            "findings": [
                {"text": "Company A revenue was $4.2 billion", "citations": [1]},
                {"text": "Company B revenue was $2.7 billion", "citations": [2]},
                {"text": "Company A is the market leader", "citations": []}
            ],
            "analysis": [{"text": "Company A revenue exceeded Company B revenue", "citations": [1, 2]}],
            "gaps": []
        }),
    ));
    let config = FathomConfig::default();
    let synthesiser = AnswerSynthesiser::new(client(&model), &config.agents);
    let ev = evidence();

    let out = synthesiser
        .synthesize(&Question::new("Compare revenue"), &ev, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.findings.len(), 2);
    assert_eq!(out.value.analysis.len(), 1);
    assert_eq!(out.value.evidence_digest, ev.digest());
    assert!(out.value.verify_citations(&ev).is_ok());
}

#[tokio::test]
async fn empty_evidence_yields_gaps_only_without_a_call() {
    let model = Arc::new(ScriptedModel::new());
    let config = FathomConfig::default();
    let synthesiser = AnswerSynthesiser::new(client(&model), &config.agents);

    let out = synthesiser
        .synthesize(&Question::new("Company A Q4 revenue"), &EvidenceSet::empty(), 1, RunDeadline::unbounded())
        .await;
    assert!(!out.value.has_claims());
    assert!(out.value.gaps[0].contains("Company A Q4 revenue"));
    assert_eq!(model.total_calls(), 0);
}

#[tokio::test]
async fn malformed_synthesis_reports_failure_in_gaps() {
    let model = Arc::new(ScriptedModel::new().reply(Stage::Synthesizing, "Revenue was high."));
    let config = FathomConfig::default();
    let synthesiser = AnswerSynthesiser::new(client(&model), &config.agents);

    let out = synthesiser
        .synthesize(&Question::new("Compare revenue"), &evidence(), 1, RunDeadline::unbounded())
        .await;
    assert!(out.value.gaps[0].starts_with("Synthesis failed"));
    assert!(out.is_degraded());
}

// --- Evaluator ---

fn cited_answer(ev: &EvidenceSet) -> Answer {
    Answer {
        summary: "Company A reported higher revenue than Company B.".into(),
        findings: vec![
            Claim::new("Company A revenue was $4.2 billion in fiscal 2023", vec![1]),
            Claim::new("Company B revenue was $2.7 billion in fiscal 2023", vec![2]),
        ],
        ..Answer::gaps_only(Vec::new(), ev, 1)
    }
}

#[tokio::test]
async fn grounded_complete_answer_is_accepted() {
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Evaluating,
        json!({"hallucination_score": 0.05, "complete": true, "missing": [], "feedback": "Well supported."}),
    ));
    let config = FathomConfig::default();
    let evaluator = AnswerEvaluator::new(client(&model), &config.agents, &config.evaluation);
    let ev = evidence();

    let out = evaluator
        .evaluate(&Question::new("Compare revenue"), &cited_answer(&ev), &ev, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.decision, Decision::Accept);
    assert_eq!(out.value.basis, VerdictBasis::ModelJudged);
    assert!((out.value.groundedness() - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn lexical_check_overrides_a_lenient_model() {
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Evaluating,
        json!({"hallucination_score": 0.0, "complete": true}),
    ));
    let config = FathomConfig::default();
    let evaluator = AnswerEvaluator::new(client(&model), &config.agents, &config.evaluation);
    let ev = evidence();
    let mut answer = cited_answer(&ev);
    answer.findings[1] = Claim::new("Company B Q4 revenue was $0.9 billion", vec![2]);

    let out = evaluator
        .evaluate(&Question::new("Compare revenue"), &answer, &ev, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.decision, Decision::Reject);
    assert!((out.value.hallucination_score - 0.5).abs() < 1e-9);
    assert!(out.value.feedback.message.contains("claim 2"));
}

#[tokio::test]
async fn incomplete_answer_is_rejected_with_missing_items() {
    let model = Arc::new(ScriptedModel::new().reply_json(
        Stage::Evaluating,
        json!({"hallucination_score": 0.1, "complete": false, "missing": ["Q4 revenue"], "feedback": "Q4 is not covered."}),
    ));
    let config = FathomConfig::default();
    let evaluator = AnswerEvaluator::new(client(&model), &config.agents, &config.evaluation);
    let ev = evidence();

    let out = evaluator
        .evaluate(&Question::new("Quarterly revenue"), &cited_answer(&ev), &ev, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.decision, Decision::Reject);
    assert_eq!(out.value.feedback.missing, vec!["Q4 revenue".to_string()]);
    assert!(out.value.feedback.mentions("Q4"));
}

#[tokio::test]
async fn empty_evidence_is_incomplete_without_a_call() {
    let model = Arc::new(ScriptedModel::new());
    let config = FathomConfig::default();
    let evaluator = AnswerEvaluator::new(client(&model), &config.agents, &config.evaluation);
    let empty = EvidenceSet::empty();
    let answer = Answer::gaps_only(vec!["No evidence was found for: Q4 revenue".into()], &empty, 1);

    let out = evaluator
        .evaluate(&Question::new("Q4 revenue"), &answer, &empty, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.decision, Decision::Reject);
    assert!(!out.value.complete);
    assert_eq!(out.value.basis, VerdictBasis::NoEvidence);
    assert_eq!(out.value.feedback.missing, answer.gaps);
    assert_eq!(model.total_calls(), 0);
}

#[tokio::test]
async fn malformed_judgment_is_unable_to_verify() {
    let model = Arc::new(ScriptedModel::new().reply(Stage::Evaluating, "Looks fine to me!"));
    let config = FathomConfig::default();
    let evaluator = AnswerEvaluator::new(client(&model), &config.agents, &config.evaluation);
    let ev = evidence();

    let out = evaluator
        .evaluate(&Question::new("Compare revenue"), &cited_answer(&ev), &ev, 1, RunDeadline::unbounded())
        .await;
    assert_eq!(out.value.decision, Decision::Reject);
    assert_eq!(out.value.basis, VerdictBasis::UnableToVerify);
    assert!(out.value.feedback.message.starts_with(UNABLE_TO_VERIFY));
}
