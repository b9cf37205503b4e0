use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights for combining the two retrieval methods into one fused score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the semantic similarity score.
    pub semantic_weight: f64,
    /// Weight of the keyword (lexical) score.
    pub keyword_weight: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            semantic_weight: defaults::DEFAULT_SEMANTIC_WEIGHT,
            keyword_weight: defaults::DEFAULT_KEYWORD_WEIGHT,
        }
    }
}

/// Coverage-group fairness adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    /// Groups whose mean fused score falls below this floor get boosted.
    pub floor: f64,
    /// Multiplicative boost applied to every candidate of an under-scored group.
    pub boost_factor: f64,
    /// Optional ceiling for boosted scores. `None` leaves boosts uncapped.
    pub boost_cap: Option<f64>,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            floor: defaults::DEFAULT_BIAS_FLOOR,
            boost_factor: defaults::DEFAULT_BOOST_FACTOR,
            boost_cap: None,
        }
    }
}
