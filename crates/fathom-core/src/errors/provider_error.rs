/// Failures of the external index provider or reasoning model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("provider {provider} failed: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("malformed output from {stage}: {reason}")]
    MalformedOutput { stage: String, reason: String },
}

impl ProviderError {
    /// Timeouts and provider failures are worth retrying; malformed output is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn malformed(stage: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }
}
