//! # fathom-tokens
//!
//! Token counting for reasoning calls via `tiktoken-rs` (`cl100k_base`).
//! Caches results per content hash; falls back to whitespace splitting when
//! the tokenizer cannot be loaded.

pub mod counter;

pub use counter::{TokenCounter, TokenUsage};
