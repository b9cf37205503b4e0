//! # fathom-retrieval
//!
//! Candidate retrieval and ordering for one research round:
//! parallel semantic + keyword fan-out over the index provider, weighted
//! fusion with group-fairness boosting, pool bounding, and listwise
//! re-ranking into the final evidence set.

pub mod fusion;
pub mod ranking;
pub mod search;

pub use fusion::{FusionEngine, FusionResult};
pub use ranking::Reranker;
pub use search::{CandidateRetriever, RetrievalReport, RetrievalRound, TaggedHit};
