// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types for the long-term memory system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which collection a memory document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// One completed user/assistant exchange.
    Conversation,
    /// One extracted fact candidate.
    Fact,
}

impl DocumentKind {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Conversation => "conversation",
            DocumentKind::Fact => "fact",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "fact" => DocumentKind::Fact,
            _ => DocumentKind::Conversation,
        }
    }
}

/// Category assigned to an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactCategory {
    Preference,
    Habit,
    PersonalInfo,
    Skill,
    Goal,
    Experience,
    /// The assistant restated something the user previously said.
    Confirmation,
}

impl FactCategory {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactCategory::Preference => "preference",
            FactCategory::Habit => "habit",
            FactCategory::PersonalInfo => "personal_info",
            FactCategory::Skill => "skill",
            FactCategory::Goal => "goal",
            FactCategory::Experience => "experience",
            FactCategory::Confirmation => "confirmation",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "preference" => Some(FactCategory::Preference),
            "habit" => Some(FactCategory::Habit),
            "personal_info" => Some(FactCategory::PersonalInfo),
            "skill" => Some(FactCategory::Skill),
            "goal" => Some(FactCategory::Goal),
            "experience" => Some(FactCategory::Experience),
            "confirmation" => Some(FactCategory::Confirmation),
            _ => None,
        }
    }
}

/// Which side of the exchange a fact was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactSource {
    UserMessage,
    AssistantResponse,
}

impl FactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactSource::UserMessage => "user_message",
            FactSource::AssistantResponse => "assistant_response",
        }
    }

    pub fn from_str_value(s: &str) -> Self {
        match s {
            "assistant_response" => FactSource::AssistantResponse,
            _ => FactSource::UserMessage,
        }
    }
}

/// Extraction confidence. Identity statements rank above the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }

    pub fn from_str_value(s: &str) -> Self {
        match s {
            "high" => Confidence::High,
            _ => Confidence::Medium,
        }
    }
}

/// A categorized, confidence-scored statement extracted from a turn
/// pair. Transient until accepted into the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCandidate {
    pub content: String,
    pub category: FactCategory,
    pub source: FactSource,
    pub confidence: Confidence,
    pub timestamp: DateTime<Utc>,
}

/// An immutable embedded text record in the long-term store.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    /// Unique identifier (`conv_`/`fact_`-prefixed UUID).
    pub id: String,
    /// The document text.
    pub text: String,
    /// Embedding vector for semantic search.
    pub embedding: Vec<f32>,
    /// Session the document was created in (conversation docs only).
    pub session_id: Option<String>,
    /// Fact category (fact docs only).
    pub category: Option<FactCategory>,
    /// Fact source (fact docs only).
    pub source: Option<FactSource>,
    /// Fact confidence (fact docs only).
    pub confidence: Option<Confidence>,
    /// Which collection this document belongs to.
    pub kind: DocumentKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Top-ranked documents per collection for one retrieval query.
#[derive(Debug, Clone, Default)]
pub struct MemoryContext {
    pub conversations: Vec<MemoryDocument>,
    pub facts: Vec<MemoryDocument>,
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// For L2-normalized vectors this is equivalent to the dot product.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
