//! Data model shared by every pipeline stage.

pub mod answer;
pub mod candidate;
pub mod classification;
pub mod degradation_event;
pub mod evidence_set;
pub mod question;
pub mod stage;
pub mod state;
pub mod sub_query;
pub mod trace;
pub mod verdict;

pub use answer::{Answer, AnswerConfidence, Claim};
pub use candidate::{Candidate, CandidateKey, SearchHit, SearchMode, SourceMetadata};
pub use classification::{Classification, Complexity, QueryCategory, Route};
pub use degradation_event::DegradationEvent;
pub use evidence_set::EvidenceSet;
pub use question::Question;
pub use stage::{Stage, StageOutput};
pub use state::{PipelineState, RunOutcome};
pub use sub_query::{SubQuery, SubQueryOrigin};
pub use trace::{RunTrace, StageTrace, StageUsage, TransitionRecord};
pub use verdict::{Decision, Feedback, Verdict, VerdictBasis};
