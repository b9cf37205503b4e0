//! Lenient JSON extraction from model output.
//!
//! Models wrap JSON in markdown fences or surround it with prose. The first
//! `{` or `[` opens the payload; the last matching closer ends it.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::errors::ProviderError;

/// Markdown code fence, optionally tagged `json`.
static FENCE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").ok());

/// Slice out the JSON payload of a model response, if any.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let body = FENCE_RE
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let (start, close) = match (body.find('{'), body.find('[')) {
        (None, None) => return None,
        (Some(b), None) => (b, '}'),
        (None, Some(k)) => (k, ']'),
        (Some(b), Some(k)) if b < k => (b, '}'),
        (_, Some(k)) => (k, ']'),
    };
    let end = body.rfind(close)?;
    (end > start).then(|| &body[start..=end])
}

/// Extract and deserialize a model response for `stage`.
pub fn parse_json<T: DeserializeOwned>(stage: &str, text: &str) -> Result<T, ProviderError> {
    let payload =
        extract_json(text).ok_or_else(|| ProviderError::malformed(stage, "no JSON found"))?;
    serde_json::from_str(payload).map_err(|e| ProviderError::malformed(stage, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Ranked {
        ranked_indices: Vec<usize>,
    }

    #[test]
    fn strips_markdown_fence() {
        let text = "Here you go:\n```json\n{\"ranked_indices\": [2, 1]}\n```\nthanks";
        let r: Ranked = parse_json("rerank", text).unwrap();
        assert_eq!(r.ranked_indices, vec![2, 1]);
    }

    #[test]
    fn finds_payload_in_prose() {
        assert_eq!(extract_json("sure {\"a\": 1} done"), Some("{\"a\": 1}"));
        assert_eq!(extract_json("list: [1, 2]"), Some("[1, 2]"));
    }

    #[test]
    fn missing_payload_is_malformed() {
        let err = parse_json::<Ranked>("rerank", "no idea").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedOutput { .. }));
        let err = parse_json::<Ranked>("rerank", "{\"other\": 1}").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedOutput { .. }));
    }
}
