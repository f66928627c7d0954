// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term semantic memory for Mnemo.
//!
//! Combines a deterministic feature-hash embedder, a SQLite-backed
//! document store with two append-only collections (conversations and
//! facts), and a heuristic trigger-phrase fact extractor.

pub mod embedder;
pub mod extractor;
pub mod store;
pub mod types;

pub use embedder::{EMBEDDING_DIM, HashEmbedder};
pub use extractor::{CONFIRMATION_PHRASES, FACT_PATTERNS, IDENTITY_PHRASES, extract_facts};
pub use store::MemoryStore;
pub use types::{
    Confidence, DocumentKind, FactCandidate, FactCategory, FactSource, MemoryContext,
    MemoryDocument, cosine_similarity,
};
