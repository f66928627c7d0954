// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed semantic memory store.
//!
//! Two append-only collections (conversations, facts) share one
//! `documents` table keyed by kind. Embeddings are stored as BLOBs and
//! similarity queries run a brute-force cosine scan over the collection
//! in insertion order, so ranking ties resolve to the earlier document.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use mnemo_core::{EmbeddingAdapter, EmbeddingInput, MnemoError, SessionId};

use crate::types::{
    Confidence, DocumentKind, FactCandidate, FactCategory, FactSource, MemoryContext,
    MemoryDocument, blob_to_vec, cosine_similarity, vec_to_blob,
};

/// Helper to convert tokio_rusqlite errors into MnemoError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MnemoError {
    MnemoError::Storage { source: Box::new(e) }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY NOT NULL,
    kind TEXT NOT NULL,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL,
    session_id TEXT,
    category TEXT,
    source TEXT,
    confidence TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_kind ON documents(kind);";

/// Persistent store for memory documents in SQLite.
pub struct MemoryStore {
    conn: Connection,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl MemoryStore {
    /// Opens (or creates) the store at the given path.
    pub async fn open(
        path: impl Into<PathBuf>,
        embedder: Arc<dyn EmbeddingAdapter>,
    ) -> Result<Self, MnemoError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MnemoError::Storage { source: Box::new(e) })?;
        }
        let conn = Connection::open(path).await.map_err(storage_err)?;
        Self::with_connection(conn, embedder).await
    }

    /// Wraps an existing connection, applying the schema.
    pub async fn with_connection(
        conn: Connection,
        embedder: Arc<dyn EmbeddingAdapter>,
    ) -> Result<Self, MnemoError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        debug!("memory store ready");
        Ok(Self { conn, embedder })
    }

    /// Record one completed exchange in the conversations collection.
    ///
    /// The document text is the combined `"User: {u}\nAssistant: {a}"`
    /// form, tagged with the session id.
    pub async fn add_conversation(
        &self,
        session_id: &SessionId,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), MnemoError> {
        let text = format!("User: {user_text}\nAssistant: {assistant_text}");
        let embedding = self.embed_one(&text).await?;

        let id = format!("conv_{}", Uuid::new_v4());
        let session = session_id.0.clone();
        let created_at = Utc::now().to_rfc3339();
        let blob = vec_to_blob(&embedding);

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO documents (id, kind, content, embedding, session_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![
                        id,
                        DocumentKind::Conversation.as_str(),
                        text,
                        blob,
                        session,
                        created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        debug!(session_id = %session_id, "exchange recorded in memory");
        Ok(())
    }

    /// Accept a fact candidate into the facts collection.
    pub async fn add_fact(&self, fact: &FactCandidate) -> Result<(), MnemoError> {
        let embedding = self.embed_one(&fact.content).await?;

        let id = format!("fact_{}", Uuid::new_v4());
        let content = fact.content.clone();
        let category = fact.category.as_str();
        let source = fact.source.as_str();
        let confidence = fact.confidence.as_str();
        let created_at = fact.timestamp.to_rfc3339();
        let blob = vec_to_blob(&embedding);

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO documents (id, kind, content, embedding, category, source, confidence, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    rusqlite::params![
                        id,
                        DocumentKind::Fact.as_str(),
                        content,
                        blob,
                        category,
                        source,
                        confidence,
                        created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        debug!(category = fact.category.as_str(), confidence = fact.confidence.as_str(), "fact stored");
        Ok(())
    }

    /// Top-`limit` documents of one collection ranked by descending
    /// cosine similarity to `text`; ties keep insertion order.
    ///
    /// An empty collection yields an empty vector, never an error.
    pub async fn search(
        &self,
        kind: DocumentKind,
        text: &str,
        limit: usize,
    ) -> Result<Vec<MemoryDocument>, MnemoError> {
        let query_embedding = self.embed_one(text).await?;
        let documents = self.fetch_collection(kind).await?;

        let mut scored: Vec<(f32, MemoryDocument)> = documents
            .into_iter()
            .filter(|doc| doc.embedding.len() == query_embedding.len())
            .map(|doc| (cosine_similarity(&query_embedding, &doc.embedding), doc))
            .collect();

        // Stable sort: equal scores keep the rowid fetch order, so the
        // earlier insertion wins.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Top-`limit` documents from each collection for one query.
    pub async fn relevant_memories(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<MemoryContext, MnemoError> {
        Ok(MemoryContext {
            conversations: self.search(DocumentKind::Conversation, text, limit).await?,
            facts: self.search(DocumentKind::Fact, text, limit).await?,
        })
    }

    /// All stored facts grouped by category (display read).
    pub async fn facts_by_category(
        &self,
    ) -> Result<BTreeMap<FactCategory, Vec<MemoryDocument>>, MnemoError> {
        let facts = self.fetch_collection(DocumentKind::Fact).await?;
        let mut grouped: BTreeMap<FactCategory, Vec<MemoryDocument>> = BTreeMap::new();
        for doc in facts {
            if let Some(category) = doc.category {
                grouped.entry(category).or_default().push(doc);
            }
        }
        Ok(grouped)
    }

    /// The most recently recorded exchanges, newest first (display read).
    pub async fn recent_conversations(
        &self,
        limit: usize,
    ) -> Result<Vec<MemoryDocument>, MnemoError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, kind, content, embedding, session_id, category, source, confidence, created_at
                     FROM documents WHERE kind = 'conversation'
                     ORDER BY rowid DESC LIMIT ?1",
                )?;
                let docs = stmt
                    .query_map(rusqlite::params![limit as i64], |row| Ok(row_to_document(row)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(docs)
            })
            .await
            .map_err(storage_err)
    }

    /// Fetch a whole collection in insertion (rowid) order.
    async fn fetch_collection(
        &self,
        kind: DocumentKind,
    ) -> Result<Vec<MemoryDocument>, MnemoError> {
        let kind_str = kind.as_str();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, kind, content, embedding, session_id, category, source, confidence, created_at
                     FROM documents WHERE kind = ?1 ORDER BY rowid ASC",
                )?;
                let docs = stmt
                    .query_map(rusqlite::params![kind_str], |row| Ok(row_to_document(row)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(docs)
            })
            .await
            .map_err(storage_err)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MnemoError::Internal("embedding returned no results".to_string()))
    }
}

/// Convert a rusqlite Row to a MemoryDocument.
fn row_to_document(row: &rusqlite::Row) -> MemoryDocument {
    let kind_str: String = row.get(1).unwrap_or_default();
    let embedding_blob: Vec<u8> = row.get(3).unwrap_or_default();
    let category: Option<String> = row.get(5).unwrap_or(None);
    let source: Option<String> = row.get(6).unwrap_or(None);
    let confidence: Option<String> = row.get(7).unwrap_or(None);
    let created_at: String = row.get(8).unwrap_or_default();

    MemoryDocument {
        id: row.get(0).unwrap_or_default(),
        text: row.get(2).unwrap_or_default(),
        embedding: blob_to_vec(&embedding_blob),
        session_id: row.get(4).unwrap_or(None),
        category: category.as_deref().and_then(FactCategory::from_str_value),
        source: source.as_deref().map(FactSource::from_str_value),
        confidence: confidence.as_deref().map(Confidence::from_str_value),
        kind: DocumentKind::from_str_value(&kind_str),
        created_at: created_at
            .parse::<DateTime<Utc>>()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;
    use crate::extractor::extract_facts;

    async fn test_store() -> MemoryStore {
        let conn = Connection::open_in_memory().await.unwrap();
        MemoryStore::with_connection(conn, Arc::new(HashEmbedder::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_returns_empty_sequences() {
        let store = test_store().await;
        let memories = store.relevant_memories("anything", 3).await.unwrap();
        assert!(memories.conversations.is_empty());
        assert!(memories.facts.is_empty());
    }

    #[tokio::test]
    async fn add_conversation_builds_combined_document() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        store
            .add_conversation(&sid, "hello there", "hi, how can I help?")
            .await
            .unwrap();

        let memories = store.relevant_memories("hello", 3).await.unwrap();
        assert_eq!(memories.conversations.len(), 1);
        let doc = &memories.conversations[0];
        assert_eq!(doc.text, "User: hello there\nAssistant: hi, how can I help?");
        assert_eq!(doc.session_id.as_deref(), Some("s1"));
        assert_eq!(doc.kind, DocumentKind::Conversation);
        assert!(doc.id.starts_with("conv_"));
    }

    #[tokio::test]
    async fn add_fact_preserves_metadata() {
        let store = test_store().await;
        let facts = extract_facts(
            "I am a software developer",
            "",
            "2026-03-01T00:00:00Z".parse().unwrap(),
        );
        assert_eq!(facts.len(), 1);
        store.add_fact(&facts[0]).await.unwrap();

        let memories = store.relevant_memories("software developer", 3).await.unwrap();
        assert_eq!(memories.facts.len(), 1);
        let doc = &memories.facts[0];
        assert_eq!(doc.text, "I am a software developer");
        assert_eq!(doc.category, Some(FactCategory::PersonalInfo));
        assert_eq!(doc.source, Some(FactSource::UserMessage));
        assert_eq!(doc.confidence, Some(Confidence::High));
        assert!(doc.id.starts_with("fact_"));
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        store
            .add_conversation(&sid, "tell me about rust programming", "rust is a language")
            .await
            .unwrap();
        store
            .add_conversation(&sid, "what's for dinner tonight", "maybe pasta")
            .await
            .unwrap();

        let results = store
            .search(DocumentKind::Conversation, "rust programming", 2)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(
            results[0].text.contains("rust programming"),
            "most similar document should rank first, got: {}",
            results[0].text
        );
    }

    #[tokio::test]
    async fn search_limit_is_applied() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        for i in 0..5 {
            store
                .add_conversation(&sid, &format!("message {i}"), "ok")
                .await
                .unwrap();
        }

        let results = store
            .search(DocumentKind::Conversation, "message", 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        // Identical documents embed identically: every score ties.
        for _ in 0..3 {
            store
                .add_conversation(&sid, "same text", "same reply")
                .await
                .unwrap();
        }

        let first = store
            .search(DocumentKind::Conversation, "unrelated query", 3)
            .await
            .unwrap();
        let second = store
            .search(DocumentKind::Conversation, "unrelated query", 3)
            .await
            .unwrap();
        let ids_a: Vec<&str> = first.iter().map(|d| d.id.as_str()).collect();
        let ids_b: Vec<&str> = second.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids_a, ids_b, "tie order must be stable across queries");
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        store.add_conversation(&sid, "hello", "hi").await.unwrap();

        let memories = store.relevant_memories("hello", 3).await.unwrap();
        assert_eq!(memories.conversations.len(), 1);
        assert!(memories.facts.is_empty());
    }

    #[tokio::test]
    async fn facts_by_category_groups_documents() {
        let store = test_store().await;
        let now = "2026-03-01T00:00:00Z".parse().unwrap();
        for fact in extract_facts("I like tea. I am a developer.", "", now) {
            store.add_fact(&fact).await.unwrap();
        }

        let grouped = store.facts_by_category().await.unwrap();
        assert_eq!(grouped[&FactCategory::Preference].len(), 1);
        assert_eq!(grouped[&FactCategory::PersonalInfo].len(), 1);
    }

    #[tokio::test]
    async fn recent_conversations_newest_first() {
        let store = test_store().await;
        let sid = SessionId::from("s1");
        store.add_conversation(&sid, "first", "a").await.unwrap();
        store.add_conversation(&sid, "second", "b").await.unwrap();
        store.add_conversation(&sid, "third", "c").await.unwrap();

        let recent = store.recent_conversations(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].text.contains("third"));
        assert!(recent[1].text.contains("second"));
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.db");
        let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(HashEmbedder::new());
        let sid = SessionId::from("s1");

        {
            let store = MemoryStore::open(&path, Arc::clone(&embedder)).await.unwrap();
            store.add_conversation(&sid, "remember me", "noted").await.unwrap();
        }

        let store = MemoryStore::open(&path, embedder).await.unwrap();
        let memories = store.relevant_memories("remember", 3).await.unwrap();
        assert_eq!(memories.conversations.len(), 1);
    }
}
