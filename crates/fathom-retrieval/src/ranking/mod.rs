//! Pool bounding and listwise re-ranking into the evidence set.

pub mod pool;
pub mod reranker;

pub use reranker::Reranker;
