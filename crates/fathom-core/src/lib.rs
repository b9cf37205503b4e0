//! # fathom-core
//!
//! Foundation crate for the Fathom research pipeline.
//! Defines the data model, provider traits, errors, config, call policies,
//! and model-output parsing helpers. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod json;
pub mod models;
pub mod resilience;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::FathomConfig;
pub use errors::{FathomError, FathomResult};
pub use models::{
    Answer, Candidate, Claim, Classification, EvidenceSet, Question, Route, SubQuery, Verdict,
};
pub use resilience::{CallPolicy, RunDeadline};
