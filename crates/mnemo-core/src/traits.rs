// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the seams of the engine.

use async_trait::async_trait;

use crate::error::MnemoError;

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

/// Adapter for generating vector embeddings from text.
///
/// Embedding adapters power semantic search and memory retrieval by
/// converting document and query text into vector representations.
/// Implementations must be deterministic for a given input.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    /// Generates embeddings for the given input, one vector per text.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MnemoError>;
}
