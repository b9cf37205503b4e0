//! Configuration system for Fathom.
//! TOML-based, layered resolution: CLI > env > file > defaults.

pub mod agent_config;
pub mod defaults;
pub mod fathom_config;
pub mod fusion_config;
pub mod observability_config;
pub mod pipeline_config;
pub mod provider_config;
pub mod retrieval_config;
pub mod validation_config;

pub use agent_config::{AgentConfig, Temperatures};
pub use fathom_config::{CliOverrides, FathomConfig};
pub use fusion_config::{BiasConfig, FusionConfig};
pub use observability_config::ObservabilityConfig;
pub use pipeline_config::{EvaluationConfig, PipelineConfig};
pub use provider_config::ProviderConfig;
pub use retrieval_config::RetrievalConfig;
pub use validation_config::ValidationConfig;
