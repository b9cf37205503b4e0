use serde::{Deserialize, Serialize};

/// Whether a question needs the research pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    /// General knowledge or conversational; answered in one call.
    Direct,
    /// Needs document retrieval and cited synthesis.
    Research,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Simple,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Financial,
    Risk,
    Market,
    General,
}

impl QueryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Risk => "risk",
            Self::Market => "market",
            Self::General => "general",
        }
    }
}

/// Routing decision for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub route: Route,
    pub complexity: Complexity,
    pub category: QueryCategory,
    /// True when the model could not classify and the fallback was used.
    #[serde(default)]
    pub degraded: bool,
}

impl Classification {
    /// Used when classification fails: take the research path.
    pub fn fallback() -> Self {
        Self {
            route: Route::Research,
            complexity: Complexity::Complex,
            category: QueryCategory::General,
            degraded: true,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.route == Route::Direct
    }
}
