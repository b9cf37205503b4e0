use fathom_core::models::{
    DegradationEvent, Feedback, QueryCategory, RunOutcome, RunTrace, Stage, StageTrace,
    StageUsage, Verdict,
};
use fathom_core::config::ValidationConfig;
use fathom_observability::{RunMetrics, RunScore};

fn trace(rounds: u32, tokens: usize) -> RunTrace {
    let mut t = RunTrace::new();
    t.rounds = rounds;
    t.evaluator_invocations = rounds;
    t.total_elapsed_ms = 100;
    t.stages.push(StageTrace {
        stage: Stage::Synthesizing,
        round: 1,
        elapsed_ms: 40,
        usage: StageUsage {
            model_calls: 1,
            prompt_tokens: tokens,
            completion_tokens: tokens / 2,
            ..Default::default()
        },
        degraded: false,
    });
    t
}

#[test]
fn metrics_aggregate_outcomes_and_tokens() {
    let mut metrics = RunMetrics::new();
    let accept = Verdict::judged(0.1, true, 0.3, Feedback::default(), 1);
    let reject = Verdict::judged(0.5, false, 0.3, Feedback::default(), 2);

    let score = |outcome, verdict: &Verdict| RunScore::assess(outcome, verdict, 1.0);
    metrics.record(
        &trace(1, 100),
        RunOutcome::Accepted,
        &accept,
        Some(QueryCategory::Financial),
        score(RunOutcome::Accepted, &accept),
    );
    let mut exhausted = trace(2, 200);
    exhausted
        .degradations
        .push(DegradationEvent::new(Stage::Reranking, "timeout", "fused order"));
    metrics.record(
        &exhausted,
        RunOutcome::Exhausted,
        &reject,
        Some(QueryCategory::Financial),
        score(RunOutcome::Exhausted, &reject),
    );
    metrics.record(
        &RunTrace::new(),
        RunOutcome::Direct,
        &Verdict::direct(),
        Some(QueryCategory::General),
        score(RunOutcome::Direct, &Verdict::direct()),
    );

    assert_eq!(metrics.runs, 3);
    assert_eq!(metrics.accepted, 1);
    assert_eq!(metrics.exhausted, 1);
    assert_eq!(metrics.direct, 1);
    assert_eq!(metrics.prompt_tokens, 300);
    assert_eq!(metrics.completion_tokens, 150);
    assert_eq!(metrics.degradations.get("reranking"), Some(&1));
    assert!((metrics.mean_rounds() - 1.5).abs() < 1e-9);
    assert!((metrics.mean_hallucination().unwrap() - 0.3).abs() < 1e-9);

    let financial = metrics.by_category["financial"];
    assert_eq!(financial.runs, 2);
    assert!((financial.acceptance_rate() - 0.5).abs() < 1e-9);
    assert_eq!(metrics.passed, 2);
    assert!((metrics.pass_rate() - 2.0 / 3.0).abs() < 1e-9);

    let summary = metrics.summary();
    assert_eq!(summary["runs"], 3);
}

#[test]
fn empty_metrics_have_zero_rates() {
    let metrics = RunMetrics::new();
    assert_eq!(metrics.acceptance_rate(), 0.0);
    assert_eq!(metrics.mean_rounds(), 0.0);
    assert!(metrics.mean_hallucination().is_none());
}

fn record_runs(
    metrics: &mut RunMetrics,
    category: QueryCategory,
    outcome: RunOutcome,
    hallucination: f64,
    coverage: f64,
    count: usize,
) {
    let verdict = Verdict::judged(hallucination, true, 0.3, Feedback::default(), 1);
    for _ in 0..count {
        metrics.record(
            &trace(1, 10),
            outcome,
            &verdict,
            Some(category),
            RunScore::assess(outcome, &verdict, coverage),
        );
    }
}

#[test]
fn healthy_batch_meets_every_criterion() {
    let mut metrics = RunMetrics::new();
    record_runs(&mut metrics, QueryCategory::Financial, RunOutcome::Accepted, 0.0, 1.0, 3);
    record_runs(&mut metrics, QueryCategory::Risk, RunOutcome::Accepted, 0.02, 1.0, 3);

    let report = metrics.validate(&ValidationConfig::default());
    assert!(report.passed, "{:?}", report.failures());
    assert!(!report.groups.skipped);
    assert_eq!(report.groups.groups.len(), 2);
}

#[test]
fn missing_expected_content_fails_the_pass_rate() {
    let mut metrics = RunMetrics::new();
    record_runs(&mut metrics, QueryCategory::Financial, RunOutcome::Accepted, 0.0, 0.8, 2);

    let report = metrics.validate(&ValidationConfig::default());
    assert!(!report.passed);
    let failed: Vec<&str> = report.criteria.iter().filter(|c| !c.passed).map(|c| c.name).collect();
    assert_eq!(failed, vec!["pass_rate"]);
    // Two runs are below the sample minimum for the group check.
    assert!(report.groups.skipped);
}

#[test]
fn hallucinating_batch_fails_its_threshold() {
    let mut metrics = RunMetrics::new();
    record_runs(&mut metrics, QueryCategory::Financial, RunOutcome::Accepted, 0.2, 1.0, 2);

    let report = metrics.validate(&ValidationConfig::default());
    assert!(report
        .criteria
        .iter()
        .any(|c| c.name == "mean_hallucination" && !c.passed));
}

#[test]
fn category_disparity_is_flagged() {
    let mut metrics = RunMetrics::new();
    record_runs(&mut metrics, QueryCategory::Financial, RunOutcome::Accepted, 0.0, 1.0, 3);
    record_runs(&mut metrics, QueryCategory::Market, RunOutcome::Exhausted, 0.0, 0.0, 3);

    let report = metrics.validate(&ValidationConfig::default());
    assert!(!report.groups.passed);
    assert!((report.groups.max_gap - 0.5).abs() < 1e-9);
    let failures = report.failures();
    assert!(failures.iter().any(|f| f.contains("category market")));
    assert!(failures.iter().any(|f| f.contains("gap")));
}
