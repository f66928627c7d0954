// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session conversation buffer with durable persistence.
//!
//! The buffer holds a bounded, ordered log of turns per session. Every
//! append is written through to a single JSON file mapping session ids
//! to turn sequences; the file is replaced atomically so a crash
//! mid-write never corrupts previously persisted history.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::debug;

use mnemo_core::{MnemoError, Role, SessionId, Turn};

/// Helper to convert I/O and serialization errors into MnemoError::Storage.
fn storage_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> MnemoError {
    MnemoError::Storage { source: Box::new(e) }
}

/// Bounded per-session conversation log.
///
/// Turns are kept in append order. When an append would exceed
/// `max_history`, the oldest turns are evicted first. One lock guards
/// both the in-memory mapping and the persisted file, so appends to
/// different sessions cannot interleave their writes. Appends to the
/// same session are assumed sequential by the caller.
pub struct ConversationLog {
    path: PathBuf,
    max_history: usize,
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
}

impl ConversationLog {
    /// Opens the log, reloading any previously persisted mapping.
    ///
    /// A missing file is an empty log, not an error. Sequences longer
    /// than `max_history` (from a run with a larger bound) are
    /// truncated to the most recent `max_history` turns on load.
    pub async fn load(path: impl Into<PathBuf>, max_history: usize) -> Result<Self, MnemoError> {
        let path = path.into();
        let mut sessions: HashMap<String, Vec<Turn>> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(storage_err)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(storage_err(e)),
        };

        for turns in sessions.values_mut() {
            if turns.len() > max_history {
                let excess = turns.len() - max_history;
                turns.drain(..excess);
            }
        }

        debug!(
            path = %path.display(),
            sessions = sessions.len(),
            "conversation log loaded"
        );

        Ok(Self {
            path,
            max_history,
            sessions: RwLock::new(sessions),
        })
    }

    /// Appends a turn with the current timestamp, evicting the oldest
    /// turns beyond `max_history`, then persists the whole mapping.
    pub async fn append(
        &self,
        session_id: &SessionId,
        role: Role,
        content: &str,
    ) -> Result<(), MnemoError> {
        let mut sessions = self.sessions.write().await;
        let turns = sessions.entry(session_id.0.clone()).or_default();
        turns.push(Turn::new(role, content));
        if turns.len() > self.max_history {
            let excess = turns.len() - self.max_history;
            turns.drain(..excess);
        }

        persist(&self.path, &sessions).await?;

        debug!(session_id = %session_id, role = %role, "turn appended");
        Ok(())
    }

    /// Returns the last `n` turns (or fewer) in chronological order.
    ///
    /// Unknown sessions yield an empty sequence, never an error.
    pub async fn recent(&self, session_id: &SessionId, n: usize) -> Vec<Turn> {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id.as_str()) {
            Some(turns) => {
                let start = turns.len().saturating_sub(n);
                turns[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Returns the full stored sequence for a session (display read).
    pub async fn history(&self, session_id: &SessionId) -> Vec<Turn> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Renders the last `n` turns as labelled lines for prompt inclusion.
    ///
    /// Returns an empty string when there is no history, so the caller
    /// can omit the section entirely.
    pub async fn context_summary(&self, session_id: &SessionId, n: usize) -> String {
        let turns = self.recent(session_id, n).await;
        if turns.is_empty() {
            return String::new();
        }

        let mut lines = vec!["Recent conversation:".to_string()];
        for turn in &turns {
            lines.push(format!("{}: {}", turn.role.context_label(), turn.content));
        }
        lines.join("\n")
    }
}

/// Serialize the mapping and replace the file atomically.
///
/// Writes to a sibling temp file then renames over the target, so a
/// crash mid-write leaves the previous file intact.
async fn persist(path: &Path, sessions: &HashMap<String, Vec<Turn>>) -> Result<(), MnemoError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
    }

    let bytes = serde_json::to_vec_pretty(sessions).map_err(storage_err)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(storage_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(storage_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    async fn open_log(dir: &tempfile::TempDir, max_history: usize) -> ConversationLog {
        ConversationLog::load(dir.path().join("history.json"), max_history)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn append_and_recent_in_order() {
        let dir = tempdir().unwrap();
        let log = open_log(&dir, 10).await;
        let sid = SessionId::from("s1");

        log.append(&sid, Role::User, "hello").await.unwrap();
        log.append(&sid, Role::Assistant, "hi there").await.unwrap();

        let turns = log.recent(&sid, 10).await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn unknown_session_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let log = open_log(&dir, 10).await;
        let turns = log.recent(&SessionId::from("nope"), 5).await;
        assert!(turns.is_empty());
        assert_eq!(log.context_summary(&SessionId::from("nope"), 5).await, "");
    }

    #[tokio::test]
    async fn fifo_eviction_keeps_most_recent() {
        let dir = tempdir().unwrap();
        let log = open_log(&dir, 3).await;
        let sid = SessionId::from("s1");

        for i in 0..5 {
            log.append(&sid, Role::User, &format!("msg {i}")).await.unwrap();
        }

        let turns = log.history(&sid).await;
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "msg 2");
        assert_eq!(turns[1].content, "msg 3");
        assert_eq!(turns[2].content, "msg 4");
    }

    #[tokio::test]
    async fn reload_reconstructs_identical_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let sid_a = SessionId::from("a");
        let sid_b = SessionId::from("b");

        {
            let log = ConversationLog::load(&path, 3).await.unwrap();
            for i in 0..5 {
                log.append(&sid_a, Role::User, &format!("a{i}")).await.unwrap();
            }
            log.append(&sid_b, Role::User, "b0").await.unwrap();
            log.append(&sid_b, Role::Assistant, "b1").await.unwrap();
        }

        let reloaded = ConversationLog::load(&path, 3).await.unwrap();
        let a = reloaded.history(&sid_a).await;
        assert_eq!(
            a.iter().map(|t| t.content.as_str()).collect::<Vec<_>>(),
            vec!["a2", "a3", "a4"],
            "truncation state must survive reload"
        );
        let b = reloaded.history(&sid_b).await;
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].content, "b0");
        assert_eq!(b[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn context_summary_labels_and_header() {
        let dir = tempdir().unwrap();
        let log = open_log(&dir, 10).await;
        let sid = SessionId::from("s1");

        log.append(&sid, Role::User, "what's rust?").await.unwrap();
        log.append(&sid, Role::Assistant, "a language").await.unwrap();

        let summary = log.context_summary(&sid, 5).await;
        assert_eq!(
            summary,
            "Recent conversation:\nYou: what's rust?\nAssistant: a language"
        );
    }

    #[tokio::test]
    async fn context_summary_limits_to_n_turns() {
        let dir = tempdir().unwrap();
        let log = open_log(&dir, 10).await;
        let sid = SessionId::from("s1");

        for i in 0..4 {
            log.append(&sid, Role::User, &format!("m{i}")).await.unwrap();
        }

        let summary = log.context_summary(&sid, 2).await;
        assert!(summary.contains("m2"));
        assert!(summary.contains("m3"));
        assert!(!summary.contains("m1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_to_different_sessions() {
        let dir = tempdir().unwrap();
        let log = Arc::new(open_log(&dir, 10).await);

        let mut handles = Vec::new();
        for s in 0..4 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                let sid = SessionId(format!("session-{s}"));
                for i in 0..5 {
                    log.append(&sid, Role::User, &format!("msg {i}")).await.unwrap();
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        // Reload from disk: every session's turns must be intact and ordered.
        let reloaded = ConversationLog::load(dir.path().join("history.json"), 10)
            .await
            .unwrap();
        for s in 0..4 {
            let turns = reloaded.history(&SessionId(format!("session-{s}"))).await;
            assert_eq!(turns.len(), 5, "session-{s} lost turns");
            for (i, turn) in turns.iter().enumerate() {
                assert_eq!(turn.content, format!("msg {i}"));
            }
        }
    }
}
