use super::{ConfigError, ContractError, PipelineError, ProviderError};

/// Convenience alias used throughout the workspace.
pub type FathomResult<T> = Result<T, FathomError>;

/// Top-level error aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum FathomError {
    #[error("provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("contract violation: {0}")]
    ContractError(#[from] ContractError),

    #[error("pipeline error: {0}")]
    PipelineError(#[from] PipelineError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
