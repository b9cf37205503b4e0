//! # fathom-pipeline
//!
//! Drives one question through routing, planning, retrieval, fusion,
//! re-ranking, synthesis and evaluation. Control flow is an explicit state
//! machine; the retry loop back to planning is bounded by `max_rounds`, and
//! every stage races the run deadline.

pub mod controller;
pub mod machine;
pub mod report;
pub mod run;

pub use controller::{PipelineController, RunResult};
pub use machine::{transition, PipelineEvent};
pub use run::PipelineRun;
