//! Controller state machine: one pure transition function over tagged events.

use fathom_core::errors::PipelineError;
use fathom_core::models::{Decision, PipelineState, Route, RunOutcome};

/// Something that happened while the controller was in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Routing settled. A DIRECT route is only reported once a direct
    /// answer exists; a failed direct answer is reported as RESEARCH.
    Routed(Route),
    Planned,
    Retrieved,
    Fused,
    Reranked,
    Synthesized,
    Evaluated {
        decision: Decision,
        round: u32,
        max_rounds: u32,
    },
    /// The run deadline fired while a stage was in flight.
    DeadlineExpired,
}

impl std::fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routed(Route::Direct) => f.write_str("routed(DIRECT)"),
            Self::Routed(Route::Research) => f.write_str("routed(RESEARCH)"),
            Self::Planned => f.write_str("planned"),
            Self::Retrieved => f.write_str("retrieved"),
            Self::Fused => f.write_str("fused"),
            Self::Reranked => f.write_str("reranked"),
            Self::Synthesized => f.write_str("synthesized"),
            Self::Evaluated {
                decision,
                round,
                max_rounds,
            } => write!(f, "evaluated({decision:?}, round {round}/{max_rounds})"),
            Self::DeadlineExpired => f.write_str("deadline_expired"),
        }
    }
}

/// Next state for `event` in `from`, or `IllegalTransition`.
pub fn transition(from: PipelineState, event: PipelineEvent) -> Result<PipelineState, PipelineError> {
    use PipelineEvent as E;
    use PipelineState as S;

    let next = match (from, event) {
        (S::Done(_), _) => None,
        (_, E::DeadlineExpired) => Some(S::Done(RunOutcome::Exhausted)),
        (S::Routing, E::Routed(Route::Direct)) => Some(S::Done(RunOutcome::Direct)),
        (S::Routing, E::Routed(Route::Research)) => Some(S::Planning),
        (S::Planning, E::Planned) => Some(S::Retrieving),
        (S::Retrieving, E::Retrieved) => Some(S::Fusing),
        (S::Fusing, E::Fused) => Some(S::Reranking),
        (S::Reranking, E::Reranked) => Some(S::Synthesizing),
        (S::Synthesizing, E::Synthesized) => Some(S::Evaluating),
        (
            S::Evaluating,
            E::Evaluated {
                decision,
                round,
                max_rounds,
            },
        ) => Some(match decision {
            Decision::Accept => S::Done(RunOutcome::Accepted),
            Decision::Reject if round < max_rounds => S::Planning,
            Decision::Reject => S::Done(RunOutcome::Exhausted),
        }),
        _ => None,
    };

    next.ok_or_else(|| PipelineError::IllegalTransition {
        from: from.to_string(),
        event: event.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(decision: Decision, round: u32) -> PipelineEvent {
        PipelineEvent::Evaluated {
            decision,
            round,
            max_rounds: 2,
        }
    }

    #[test]
    fn research_path_walks_every_stage() {
        let events = [
            PipelineEvent::Routed(Route::Research),
            PipelineEvent::Planned,
            PipelineEvent::Retrieved,
            PipelineEvent::Fused,
            PipelineEvent::Reranked,
            PipelineEvent::Synthesized,
            evaluated(Decision::Accept, 1),
        ];
        let mut state = PipelineState::Routing;
        for e in events {
            state = transition(state, e).unwrap();
        }
        assert_eq!(state, PipelineState::Done(RunOutcome::Accepted));
    }

    #[test]
    fn direct_route_finishes_immediately() {
        assert_eq!(
            transition(PipelineState::Routing, PipelineEvent::Routed(Route::Direct)).unwrap(),
            PipelineState::Done(RunOutcome::Direct)
        );
    }

    #[test]
    fn reject_retries_until_rounds_run_out() {
        assert_eq!(
            transition(PipelineState::Evaluating, evaluated(Decision::Reject, 1)).unwrap(),
            PipelineState::Planning
        );
        assert_eq!(
            transition(PipelineState::Evaluating, evaluated(Decision::Reject, 2)).unwrap(),
            PipelineState::Done(RunOutcome::Exhausted)
        );
    }

    #[test]
    fn deadline_exhausts_from_any_live_state() {
        for state in [
            PipelineState::Routing,
            PipelineState::Retrieving,
            PipelineState::Evaluating,
        ] {
            assert_eq!(
                transition(state, PipelineEvent::DeadlineExpired).unwrap(),
                PipelineState::Done(RunOutcome::Exhausted)
            );
        }
    }

    #[test]
    fn out_of_order_events_are_illegal() {
        let err = transition(PipelineState::Planning, PipelineEvent::Synthesized).unwrap_err();
        assert!(err.to_string().contains("PLANNING"));
        assert!(err.to_string().contains("synthesized"));
        assert!(transition(
            PipelineState::Done(RunOutcome::Accepted),
            PipelineEvent::DeadlineExpired
        )
        .is_err());
    }
}
