use fathom_core::models::SearchMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Ok,
    Failed(String),
    TimedOut,
}

impl CallStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Outcome of one (sub-query, mode) search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallReport {
    pub sub_query: String,
    pub mode: SearchMode,
    pub hits: usize,
    pub attempts: u32,
    pub status: CallStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalReport {
    pub calls: Vec<CallReport>,
}

impl RetrievalReport {
    pub fn successes(&self) -> usize {
        self.calls.iter().filter(|c| c.status.is_ok()).count()
    }

    pub fn failures(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c.status, CallStatus::Failed(_)))
            .count()
    }

    pub fn timeouts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.status == CallStatus::TimedOut)
            .count()
    }
}
