//! Top-level Fathom configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    AgentConfig, BiasConfig, EvaluationConfig, FusionConfig, ObservabilityConfig,
    PipelineConfig, ProviderConfig, RetrievalConfig, ValidationConfig,
};
use crate::constants::{MAX_RERANK_POOL_CEILING, MAX_SUB_QUERIES_CEILING};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Every stage reads from one `FathomConfig`. Resolution order (highest
/// priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FATHOM_*`)
/// 3. TOML config file
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FathomConfig {
    pub fusion: FusionConfig,
    pub bias: BiasConfig,
    pub retrieval: RetrievalConfig,
    pub agents: AgentConfig,
    pub evaluation: EvaluationConfig,
    pub pipeline: PipelineConfig,
    pub providers: ProviderConfig,
    pub observability: ObservabilityConfig,
    pub validation: ValidationConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_rounds: Option<u32>,
    pub top_k: Option<usize>,
    pub outer_deadline_ms: Option<u64>,
    pub corpus_path: Option<String>,
    pub report_dir: Option<String>,
    pub model_name: Option<String>,
}

impl FathomConfig {
    /// Load configuration with layered resolution.
    ///
    /// A missing `path` is an error only when it was given explicitly.
    pub fn load(
        path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        Self::apply_env_overrides(&mut config)?;

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the resolved configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `FATHOM_*` environment variables. A value that does not parse
    /// is a validation error naming the variable.
    pub fn apply_env_overrides(config: &mut FathomConfig) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// Apply `FATHOM_*` overrides read through `lookup`.
    pub fn apply_overrides_from(
        config: &mut FathomConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_FUSION_SEMANTIC_WEIGHT")? {
            config.fusion.semantic_weight = v;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_FUSION_KEYWORD_WEIGHT")? {
            config.fusion.keyword_weight = v;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_BIAS_FLOOR")? {
            config.bias.floor = v;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_BIAS_BOOST_FACTOR")? {
            config.bias.boost_factor = v;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_BIAS_BOOST_CAP")? {
            config.bias.boost_cap = Some(v);
        }
        if let Some(v) = env_parse::<usize>(&lookup, "FATHOM_RETRIEVAL_TOP_K")? {
            config.retrieval.top_k = v;
        }
        if let Some(v) = env_parse::<usize>(&lookup, "FATHOM_RETRIEVAL_FANOUT_CONCURRENCY")? {
            config.retrieval.fanout_concurrency = v;
        }
        if let Some(v) = env_parse::<f64>(&lookup, "FATHOM_EVALUATION_REJECT_THRESHOLD")? {
            config.evaluation.reject_threshold = v;
        }
        if let Some(v) = env_parse::<u32>(&lookup, "FATHOM_PIPELINE_MAX_ROUNDS")? {
            config.pipeline.max_rounds = v;
        }
        if let Some(v) = env_parse::<u64>(&lookup, "FATHOM_PIPELINE_OUTER_DEADLINE_MS")? {
            config.pipeline.outer_deadline_ms = v;
        }
        if let Some(v) = lookup("FATHOM_MODEL_BASE_URL") {
            config.providers.model_base_url = v;
        }
        if let Some(v) = lookup("FATHOM_MODEL_NAME") {
            config.providers.model_name = v;
        }
        if let Some(v) = lookup("FATHOM_INDEX_BASE_URL") {
            config.providers.index_base_url = Some(v);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut FathomConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_rounds {
            config.pipeline.max_rounds = v;
        }
        if let Some(v) = cli.top_k {
            config.retrieval.top_k = v;
        }
        if let Some(v) = cli.outer_deadline_ms {
            config.pipeline.outer_deadline_ms = v;
        }
        if let Some(ref v) = cli.corpus_path {
            config.providers.corpus_path = Some(v.clone());
        }
        if let Some(ref v) = cli.report_dir {
            config.observability.report_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.model_name {
            config.providers.model_name = v.clone();
        }
    }

    /// Validate the configuration values.
    pub fn validate(config: &FathomConfig) -> Result<(), ConfigError> {
        let f = &config.fusion;
        check_unit("fusion.semantic_weight", f.semantic_weight)?;
        check_unit("fusion.keyword_weight", f.keyword_weight)?;
        if f.semantic_weight + f.keyword_weight <= 0.0 {
            return Err(invalid("fusion", "weights must not both be zero"));
        }

        let b = &config.bias;
        check_unit("bias.floor", b.floor)?;
        if b.boost_factor <= 1.0 || !b.boost_factor.is_finite() {
            return Err(invalid("bias.boost_factor", "must be greater than 1.0"));
        }
        if let Some(cap) = b.boost_cap {
            if cap <= 0.0 || !cap.is_finite() {
                return Err(invalid("bias.boost_cap", "must be a positive number"));
            }
        }

        let r = &config.retrieval;
        if r.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be greater than 0"));
        }
        if r.rerank_pool_size < r.top_k || r.rerank_pool_size > MAX_RERANK_POOL_CEILING {
            return Err(invalid(
                "retrieval.rerank_pool_size",
                "must be at least top_k and at most 500",
            ));
        }
        if r.per_query_limit == 0 || r.fanout_concurrency == 0 {
            return Err(invalid(
                "retrieval",
                "per_query_limit and fanout_concurrency must be greater than 0",
            ));
        }
        if r.index_timeout_ms == 0 {
            return Err(invalid("retrieval.index_timeout_ms", "must be greater than 0"));
        }

        let a = &config.agents;
        if a.model_timeout_ms == 0 {
            return Err(invalid("agents.model_timeout_ms", "must be greater than 0"));
        }
        if a.min_sub_queries == 0
            || a.min_sub_queries > a.max_sub_queries
            || a.max_sub_queries > MAX_SUB_QUERIES_CEILING
        {
            return Err(invalid(
                "agents.min_sub_queries",
                "must satisfy 1 <= min <= max <= 12",
            ));
        }

        let e = &config.evaluation;
        if !(e.reject_threshold > 0.0 && e.reject_threshold <= 1.0) {
            return Err(invalid(
                "evaluation.reject_threshold",
                "must be in (0.0, 1.0]",
            ));
        }
        check_unit("evaluation.min_claim_overlap", e.min_claim_overlap)?;

        let p = &config.pipeline;
        if p.max_rounds == 0 {
            return Err(invalid("pipeline.max_rounds", "must be greater than 0"));
        }
        if p.outer_deadline_ms == 0 {
            return Err(invalid("pipeline.outer_deadline_ms", "must be greater than 0"));
        }

        let v = &config.validation;
        check_unit("validation.max_mean_hallucination", v.max_mean_hallucination)?;
        check_unit("validation.min_mean_quality", v.min_mean_quality)?;
        check_unit("validation.min_pass_rate", v.min_pass_rate)?;
        check_unit("validation.min_group_quality", v.min_group_quality)?;
        check_unit("validation.max_group_gap", v.max_group_gap)?;
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, &format!("cannot parse {raw:?}"))),
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0.0 and 1.0"))
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
