//! Degradation tracking for a single run.

mod tracker;

pub use tracker::DegradationTracker;
