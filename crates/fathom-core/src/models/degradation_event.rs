use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::Stage;

/// Recorded whenever a stage falls back to a deterministic lower-quality path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(stage: Stage, failure: impl Into<String>, fallback_used: impl Into<String>) -> Self {
        Self {
            component: stage.as_str().to_string(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp: Utc::now(),
        }
    }
}
