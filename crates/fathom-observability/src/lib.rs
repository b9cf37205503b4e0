//! # fathom-observability
//!
//! Structured tracing setup, run and stage events, degradation tracking,
//! and metrics aggregated across runs.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::DegradationTracker;
pub use metrics::{RunMetrics, RunScore, ValidationReport};
