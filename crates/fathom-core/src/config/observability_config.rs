use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging and report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `FATHOM_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json_logs: bool,
    /// Directory for Markdown run reports. `None` disables reports.
    pub report_dir: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: defaults::DEFAULT_JSON_LOGS,
            report_dir: None,
        }
    }
}
