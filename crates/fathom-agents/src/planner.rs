//! Query planner: question (plus evaluator feedback on retry) into 3 to 6
//! targeted sub-queries.
//!
//! The model proposes; deterministic rules guarantee that every reported gap
//! is targeted, duplicates are gone, the set differs from the previous
//! round, and gap-targeted queries survive truncation.

use std::collections::HashSet;

use fathom_core::config::AgentConfig;
use fathom_core::models::sub_query::same_texts;
use fathom_core::models::{
    DegradationEvent, Feedback, Question, Stage, StageOutput, SubQuery, SubQueryOrigin,
};
use fathom_core::resilience::RunDeadline;
use serde::Deserialize;

use crate::prompts;
use crate::reasoning::ReasoningClient;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlanReply {
    Object { sub_queries: Vec<String> },
    List(Vec<String>),
}

impl PlanReply {
    fn into_texts(self) -> Vec<String> {
        match self {
            Self::Object { sub_queries } | Self::List(sub_queries) => sub_queries,
        }
    }
}

pub struct QueryPlanner {
    client: ReasoningClient,
    temperature: f64,
    min_queries: usize,
    max_queries: usize,
}

impl QueryPlanner {
    pub fn new(client: ReasoningClient, config: &AgentConfig) -> Self {
        Self {
            client,
            temperature: config.temperatures.planner,
            min_queries: config.min_sub_queries,
            max_queries: config.max_sub_queries,
        }
    }

    /// Plan the sub-queries for `round`. On retry `prior` carries the
    /// previous set and the evaluator feedback.
    pub async fn plan(
        &self,
        question: &Question,
        prior: Option<(&[SubQuery], &Feedback)>,
        round: u32,
        deadline: RunDeadline,
    ) -> StageOutput<Vec<SubQuery>> {
        let body = prompts::plan(question, self.min_queries, self.max_queries, prior);
        let reply = self
            .client
            .complete_json::<PlanReply>(Stage::Planning, &body, self.temperature, deadline)
            .await;

        let proposed: Result<Vec<SubQuery>, String> = match reply.result {
            Ok(plan) => {
                let queries: Vec<SubQuery> = plan
                    .into_texts()
                    .into_iter()
                    .filter(|t| !t.trim().is_empty())
                    .map(|t| SubQuery::planned(t, round))
                    .collect();
                if queries.is_empty() {
                    Err("plan contained no sub-queries".to_string())
                } else {
                    Ok(queries)
                }
            }
            Err(e) => Err(e.to_string()),
        };

        match proposed {
            Ok(queries) => {
                if queries.len() < self.min_queries {
                    tracing::debug!(
                        proposed = queries.len(),
                        min = self.min_queries,
                        "planner proposed fewer sub-queries than requested"
                    );
                }
                let set = finalize(question, queries, prior, round, self.max_queries);
                log_plan(&set, round);
                StageOutput::new(set, reply.usage)
            }
            Err(reason) => {
                let fallback = vec![SubQuery::fallback(question.text(), round)];
                let set = finalize(question, fallback, prior, round, self.max_queries);
                log_plan(&set, round);
                StageOutput::new(set, reply.usage).degraded(DegradationEvent::new(
                    Stage::Planning,
                    reason,
                    "question as the only sub-query",
                ))
            }
        }
    }
}

fn log_plan(set: &[SubQuery], round: u32) {
    tracing::info!(
        round,
        sub_queries = set.len(),
        gap_targeted = set
            .iter()
            .filter(|q| q.origin == SubQueryOrigin::GapTargeted)
            .count(),
        "sub-queries planned"
    );
}

/// Apply the deterministic guarantees to a proposed set.
pub fn finalize(
    question: &Question,
    proposed: Vec<SubQuery>,
    prior: Option<(&[SubQuery], &Feedback)>,
    round: u32,
    max: usize,
) -> Vec<SubQuery> {
    let mut gap_queries: Vec<SubQuery> = Vec::new();
    if let Some((_, feedback)) = prior {
        for missing in feedback.missing.iter().filter(|m| !m.trim().is_empty()) {
            if !proposed.iter().any(|q| q.mentions(missing)) {
                gap_queries.push(SubQuery::gap_targeted(
                    format!("{} {}", question.text(), missing.trim()),
                    round,
                ));
            }
        }
    }

    let max = max.max(1);
    let mut set = dedup(gap_queries.into_iter().chain(proposed).collect());
    // Gap-targeted first so truncation keeps them.
    set.sort_by_key(|q| q.origin != SubQueryOrigin::GapTargeted);
    set.truncate(max);

    if let Some((previous, feedback)) = prior {
        if same_texts(&set, previous) {
            set = differ_from(set, previous, question, feedback, round, max);
        }
    }
    set
}

/// Prepend a feedback-driven gap query so the truncated set is never the
/// previous one again.
fn differ_from(
    set: Vec<SubQuery>,
    previous: &[SubQuery],
    question: &Question,
    feedback: &Feedback,
    round: u32,
    max: usize,
) -> Vec<SubQuery> {
    let message = feedback.message.trim();
    let first = if message.is_empty() {
        format!("{} additional sources", question.text())
    } else {
        format!("{} {}", question.text(), message)
    };
    let second = format!("{} additional sources round {}", question.text(), round);

    for text in [first, second] {
        let mut next = set.clone();
        next.insert(0, SubQuery::gap_targeted(text, round));
        let mut next = dedup(next);
        next.truncate(max);
        if !same_texts(&next, previous) {
            return next;
        }
    }
    set
}

/// Drop case- and whitespace-insensitive duplicates, keeping the first.
fn dedup(queries: Vec<SubQuery>) -> Vec<SubQuery> {
    let mut seen = HashSet::new();
    queries
        .into_iter()
        .filter(|q| !q.text.is_empty() && seen.insert(q.normalized()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(set: &[SubQuery]) -> Vec<&str> {
        set.iter().map(|q| q.text.as_str()).collect()
    }

    #[test]
    fn duplicates_are_removed() {
        let q = Question::new("Company A revenue");
        let set = finalize(
            &q,
            vec![
                SubQuery::planned("Company A revenue 2023", 1),
                SubQuery::planned("company a  REVENUE 2023", 1),
                SubQuery::planned("Company A margin", 1),
            ],
            None,
            1,
            6,
        );
        assert_eq!(texts(&set), vec!["Company A revenue 2023", "Company A margin"]);
    }

    #[test]
    fn uncovered_missing_items_get_gap_queries() {
        let q = Question::new("Company A revenue by quarter");
        let prior = vec![SubQuery::planned("Company A Q1 revenue", 1)];
        let fb = Feedback::new("quarter coverage incomplete", vec!["Q4".into(), "Q1".into()]);
        let set = finalize(
            &q,
            vec![SubQuery::planned("Company A Q1 revenue", 2), SubQuery::planned("Company A Q2 revenue", 2)],
            Some((&prior, &fb)),
            2,
            6,
        );
        assert_eq!(set[0].text, "Company A revenue by quarter Q4");
        assert_eq!(set[0].origin, SubQueryOrigin::GapTargeted);
        // Q1 is already covered by a planned query.
        assert_eq!(set.iter().filter(|s| s.origin == SubQueryOrigin::GapTargeted).count(), 1);
    }

    #[test]
    fn identical_retry_set_gets_feedback_query_prepended() {
        let q = Question::new("Company A revenue");
        let prior = vec![SubQuery::planned("Company A revenue 2023", 1)];
        let fb = Feedback::new("segment breakdown missing", vec![]);
        let set = finalize(
            &q,
            vec![SubQuery::planned("Company A revenue 2023", 2)],
            Some((&prior, &fb)),
            2,
            6,
        );
        assert!(!same_texts(&set, &prior));
        assert_eq!(set[0].text, "Company A revenue segment breakdown missing");
    }

    #[test]
    fn truncation_keeps_gap_queries() {
        let q = Question::new("Compare A and B");
        let prior: Vec<SubQuery> = Vec::new();
        let fb = Feedback::new("missing", vec!["Q4 figures".into()]);
        let proposed = (0..8).map(|i| SubQuery::planned(format!("query {i}"), 2)).collect();
        let set = finalize(&q, proposed, Some((&prior, &fb)), 2, 3);
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].origin, SubQueryOrigin::GapTargeted);
        assert!(set[0].mentions("Q4"));
    }

    #[test]
    fn full_prior_set_is_not_repeated_after_truncation() {
        let q = Question::new("Company A revenue");
        let prior: Vec<SubQuery> = (0..3).map(|i| SubQuery::planned(format!("query {i}"), 1)).collect();
        let fb = Feedback::new("segment detail missing", vec![]);
        let proposed = (0..4).map(|i| SubQuery::planned(format!("query {i}"), 2)).collect();
        let set = finalize(&q, proposed, Some((&prior, &fb)), 2, 3);
        assert_eq!(set.len(), 3);
        assert!(!same_texts(&set, &prior));
        assert_eq!(set[0].text, "Company A revenue segment detail missing");
        assert_eq!(set[0].origin, SubQueryOrigin::GapTargeted);
    }

    #[test]
    fn single_slot_retry_still_changes() {
        let q = Question::new("Company A revenue");
        let prior = vec![SubQuery::gap_targeted("Company A revenue more detail", 1)];
        let fb = Feedback::new("more detail", vec![]);
        let set = finalize(&q, vec![SubQuery::planned("Company A revenue more detail", 2)], Some((&prior, &fb)), 2, 1);
        assert_eq!(set.len(), 1);
        assert!(!same_texts(&set, &prior));
    }
}
