// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the Ollama generate API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model identifier, e.g. `llama3.2`.
    pub model: String,
    /// The fully composed prompt.
    pub prompt: String,
    /// Whether the backend should stream NDJSON records.
    pub stream: bool,
}

/// One NDJSON record from a streaming generate response, or the whole
/// body of a non-streaming one.
///
/// Records without a `response` field (metadata, final statistics) are
/// valid and carry no text.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    /// Text fragment carried by this record, if any.
    #[serde(default)]
    pub response: Option<String>,
    /// Set on the terminal record of a stream.
    #[serde(default)]
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_expected_fields() {
        let req = GenerateRequest {
            model: "llama3.2".into(),
            prompt: "hello".into(),
            stream: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["prompt"], "hello");
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn chunk_tolerates_missing_fields() {
        let chunk: GenerateChunk = serde_json::from_str("{}").unwrap();
        assert!(chunk.response.is_none());
        assert!(!chunk.done);

        let chunk: GenerateChunk =
            serde_json::from_str(r#"{"response":"Hi","done":false}"#).unwrap();
        assert_eq!(chunk.response.as_deref(), Some("Hi"));
    }

    #[test]
    fn chunk_ignores_unknown_fields() {
        let chunk: GenerateChunk = serde_json::from_str(
            r#"{"model":"llama3.2","created_at":"2026-01-01T00:00:00Z","response":"x","done":true,"total_duration":12345}"#,
        )
        .unwrap();
        assert_eq!(chunk.response.as_deref(), Some("x"));
        assert!(chunk.done);
    }
}
