// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming HTTP client for the Ollama generate API.

pub mod client;
pub mod ndjson;
pub mod types;

pub use client::OllamaClient;
pub use ndjson::parse_ndjson_stream;
pub use types::{GenerateChunk, GenerateRequest};
