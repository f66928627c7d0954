// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic feature-hash embedding adapter.
//!
//! Projects word unigrams and bigrams into a fixed-dimension signed
//! bucket space via SHA-256 and L2-normalizes the result. No model
//! files, no network: the same text always maps to the same vector,
//! and lexically overlapping texts land close under cosine similarity.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use mnemo_core::{EmbeddingAdapter, EmbeddingInput, EmbeddingOutput, MnemoError};

/// Embedding dimensions for the feature-hash space.
pub const EMBEDDING_DIM: usize = 384;

/// Hash-based embedding adapter.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashEmbedder {
    /// Creates an embedder with the standard dimension.
    pub fn new() -> Self {
        Self { dim: EMBEDDING_DIM }
    }

    /// Embed a single text string, returning an L2-normalized vector.
    ///
    /// The zero vector is returned for text with no word tokens.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut accum = vec![0.0f32; self.dim];

        for token in &tokens {
            accumulate_feature(&mut accum, token);
        }
        for pair in tokens.windows(2) {
            accumulate_feature(&mut accum, &format!("{} {}", pair[0], pair[1]));
        }

        l2_normalize(&accum)
    }
}

/// Lower-case and split into alphanumeric word tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hash one feature into a signed bucket and accumulate it.
fn accumulate_feature(accum: &mut [f32], feature: &str) {
    let digest = Sha256::digest(feature.as_bytes());
    let bucket = u64::from_le_bytes(digest[..8].try_into().unwrap()) as usize % accum.len();
    let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
    accum[bucket] += sign;
}

/// L2-normalize a vector.
fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl EmbeddingAdapter for HashEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MnemoError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.embed_text(text))
            .collect();

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dim,
        })
    }
}
