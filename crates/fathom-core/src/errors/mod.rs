//! Error handling for Fathom.
//! One error enum per subsystem, `thiserror` only; aggregated by `FathomError`.

pub mod config_error;
pub mod contract_error;
pub mod fathom_error;
pub mod pipeline_error;
pub mod provider_error;

pub use config_error::ConfigError;
pub use contract_error::ContractError;
pub use fathom_error::{FathomError, FathomResult};
pub use pipeline_error::PipelineError;
pub use provider_error::ProviderError;
