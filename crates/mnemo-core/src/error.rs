// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemo assistant engine.

use thiserror::Error;

/// The primary error type used across the Mnemo crates.
///
/// Backend failures are split into three distinct conditions
/// (unavailable, timed out, other transport error) so callers can
/// report the cause without inspecting strings. None of them are
/// retried automatically.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller's request was rejected before any backend call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Durable-store errors (history file, memory database, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The generation backend refused the connection.
    #[error("generation backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// The generation backend did not answer within the request timeout.
    #[error("generation backend timed out: {message}")]
    BackendTimeout { message: String },

    /// Any other transport or protocol error from the generation backend.
    #[error("generation backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The stream finished without yielding any response text.
    #[error("unable to obtain a response from the generation backend")]
    EmptyResponse,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
