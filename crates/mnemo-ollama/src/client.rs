// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama generate API.
//!
//! Provides [`OllamaClient`] which handles request construction,
//! streaming NDJSON responses, and mapping transport failures onto the
//! backend error taxonomy. Requests are made once; a failed generation
//! is reported, never retried.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use tracing::debug;

use mnemo_core::MnemoError;

use crate::ndjson::parse_ndjson_stream;
use crate::types::{GenerateChunk, GenerateRequest};

/// HTTP client for Ollama backend communication.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Creates a new Ollama client.
    ///
    /// # Arguments
    /// * `base_url` - Backend base URL, e.g. `http://localhost:11434`
    /// * `model` - Model identifier passed on every request
    /// * `timeout` - Whole-request deadline, including body streaming
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self, MnemoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MnemoError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sends a streaming generate request and returns the chunk stream.
    pub async fn generate_stream(
        &self,
        prompt: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateChunk, MnemoError>> + Send>>, MnemoError>
    {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: true,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "streaming generate response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MnemoError::Backend {
                message: format!("generation backend returned {status}: {body}"),
                source: None,
            });
        }

        Ok(parse_ndjson_stream(response))
    }

    /// Sends a non-streaming generate request and returns the full text.
    pub async fn generate(&self, prompt: &str) -> Result<String, MnemoError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generate response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MnemoError::Backend {
                message: format!("generation backend returned {status}: {body}"),
                source: None,
            });
        }

        let chunk: GenerateChunk =
            response.json().await.map_err(|e| MnemoError::Backend {
                message: format!("failed to parse generate response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = chunk.response.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(MnemoError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Maps a reqwest transport failure onto the backend error taxonomy.
///
/// Connection failures mean the backend is unreachable; deadline
/// overruns mean it is too slow. Everything else is a generic backend
/// error carrying the original cause.
fn map_transport_error(e: reqwest::Error) -> MnemoError {
    if e.is_connect() {
        MnemoError::BackendUnavailable {
            message: format!("cannot reach generation backend: {e}"),
        }
    } else if e.is_timeout() {
        MnemoError::BackendTimeout {
            message: format!("generation backend timed out: {e}"),
        }
    } else {
        MnemoError::Backend {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OllamaClient {
        OllamaClient::new(
            "http://localhost:11434".into(),
            "llama3.2".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn generate_stream_yields_chunks() {
        let server = MockServer::start().await;
        let body = "{\"response\":\"Hel\",\"done\":false}\n{\"response\":\"lo\",\"done\":true}\n";

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(
                serde_json::json!({"model": "llama3.2", "stream": true}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let mut stream = client.generate_stream("hi").await.unwrap();

        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            if let Some(fragment) = chunk.unwrap().response {
                text.push_str(&fragment);
            }
        }
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn generate_returns_full_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"response": "Hello there", "done": true}),
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.generate("hi").await.unwrap();
        assert_eq!(text, "Hello there");
    }

    #[tokio::test]
    async fn generate_empty_response_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"response": "   ", "done": true}),
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, MnemoError::EmptyResponse), "got: {err:?}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_backend_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not found"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_stream("hi").await.err().unwrap();
        match err {
            MnemoError::Backend { message, .. } => {
                assert!(message.contains("model not found"), "got: {message}");
            }
            other => panic!("expected Backend, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unavailable() {
        // Nothing listens on this port.
        let client = test_client("http://127.0.0.1:9");
        let err = client.generate_stream("hi").await.err().unwrap();
        assert!(
            matches!(err, MnemoError::BackendUnavailable { .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn slow_backend_maps_to_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_string("{\"response\":\"late\",\"done\":true}\n"),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(
            server.uri(),
            "llama3.2".into(),
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.generate_stream("hi").await.err().unwrap();
        assert!(
            matches!(err, MnemoError::BackendTimeout { .. }),
            "got: {err:?}"
        );
    }
}
