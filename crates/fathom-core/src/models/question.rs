use serde::{Deserialize, Serialize};

/// The user's research question. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    conversation_id: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            conversation_id: None,
        }
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Lowercased text with collapsed whitespace. Used as a cache key.
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_collapses_case_and_whitespace() {
        let q = Question::new("  What is   EBITDA? ");
        assert_eq!(q.text(), "What is   EBITDA?");
        assert_eq!(q.normalized(), "what is ebitda?");
    }
}
