use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::resilience::CallPolicy;

/// Sampling temperature per reasoning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    pub orchestrator: f64,
    pub direct: f64,
    pub planner: f64,
    pub reranker: f64,
    pub synthesiser: f64,
    pub evaluator: f64,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            orchestrator: defaults::DEFAULT_ORCHESTRATOR_TEMPERATURE,
            direct: defaults::DEFAULT_DIRECT_TEMPERATURE,
            planner: defaults::DEFAULT_PLANNER_TEMPERATURE,
            reranker: defaults::DEFAULT_RERANKER_TEMPERATURE,
            synthesiser: defaults::DEFAULT_SYNTHESISER_TEMPERATURE,
            evaluator: defaults::DEFAULT_EVALUATOR_TEMPERATURE,
        }
    }
}

/// Reasoning-stage configuration shared by orchestrator, planner,
/// re-ranker, synthesiser and evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Timeout for a single reasoning call (milliseconds).
    pub model_timeout_ms: u64,
    /// Retries after the first failed reasoning call.
    pub model_retries: u32,
    /// Initial retry backoff (milliseconds).
    pub retry_backoff_ms: u64,
    pub temperatures: Temperatures,
    /// Fewest sub-queries the planner should emit.
    pub min_sub_queries: usize,
    /// Most sub-queries the planner may emit.
    pub max_sub_queries: usize,
    /// Entries kept in the routing cache.
    pub classification_cache_capacity: u64,
}

impl AgentConfig {
    /// Call policy for reasoning model requests.
    pub fn model_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_millis(self.model_timeout_ms),
            retries: self.model_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model_timeout_ms: defaults::DEFAULT_MODEL_TIMEOUT_MS,
            model_retries: defaults::DEFAULT_MODEL_RETRIES,
            retry_backoff_ms: defaults::DEFAULT_RETRY_BACKOFF_MS,
            temperatures: Temperatures::default(),
            min_sub_queries: defaults::DEFAULT_MIN_SUB_QUERIES,
            max_sub_queries: defaults::DEFAULT_MAX_SUB_QUERIES,
            classification_cache_capacity: defaults::DEFAULT_CLASSIFICATION_CACHE_CAPACITY,
        }
    }
}
