// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat relay: one request in, a stream of events out.
//!
//! Each request moves through states: Pending -> Streaming -> Completed
//! (or Failed). The relay assembles the prompt, forwards backend text
//! fragments in arrival order, and on success finalizes the exchange
//! exactly once: the assistant turn is appended to the conversation
//! buffer and the exchange is recorded in long-term memory. A failed or
//! empty generation is reported and never retried, and writes nothing
//! to memory.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use mnemo_config::MnemoConfig;
use mnemo_core::{ChatEvent, MnemoError, Role, SessionId, Turn};
use mnemo_history::ConversationLog;
use mnemo_memory::{extract_facts, HashEmbedder, MemoryStore};
use mnemo_ollama::OllamaClient;

use crate::composer::{compose_prompt, PromptParts};
use crate::profile::ProfileStore;

/// States a chat request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Accepted, assembling context.
    Pending,
    /// Backend stream open, forwarding fragments.
    Streaming,
    /// Finalized successfully.
    Completed,
    /// Terminated with an error; nothing was written to memory.
    Failed,
}

impl std::fmt::Display for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayState::Pending => write!(f, "pending"),
            RelayState::Streaming => write!(f, "streaming"),
            RelayState::Completed => write!(f, "completed"),
            RelayState::Failed => write!(f, "failed"),
        }
    }
}

/// Orchestrates one conversation backend behind a session-scoped API.
pub struct ChatEngine {
    history: Arc<ConversationLog>,
    memory: Option<Arc<MemoryStore>>,
    backend: OllamaClient,
    profile: Arc<ProfileStore>,
    agent_name: String,
    context_turns: usize,
    retrieval_limit: usize,
}

impl ChatEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        history: Arc<ConversationLog>,
        memory: Option<Arc<MemoryStore>>,
        backend: OllamaClient,
        profile: Arc<ProfileStore>,
        agent_name: String,
        context_turns: usize,
        retrieval_limit: usize,
    ) -> Self {
        Self {
            history,
            memory,
            backend,
            profile,
            agent_name,
            context_turns,
            retrieval_limit,
        }
    }

    /// Wires up all stores and the backend client from configuration.
    pub async fn from_config(config: &MnemoConfig) -> Result<Self, MnemoError> {
        let history = Arc::new(
            ConversationLog::load(config.storage.history_path(), config.history.max_history)
                .await?,
        );

        let memory = if config.memory.enabled {
            Some(Arc::new(
                MemoryStore::open(config.storage.memory_path(), Arc::new(HashEmbedder::new()))
                    .await?,
            ))
        } else {
            info!("long-term memory disabled by configuration");
            None
        };

        let backend = OllamaClient::new(
            config.ollama.base_url.clone(),
            config.ollama.model.clone(),
            Duration::from_secs(config.ollama.timeout_secs),
        )?;

        let profile = Arc::new(ProfileStore::new(config.storage.profile_path()));

        Ok(Self::new(
            history,
            memory,
            backend,
            profile,
            config.agent.name.clone(),
            config.history.context_turns,
            config.memory.retrieval_limit,
        ))
    }

    /// Handles one message end to end without streaming.
    pub async fn chat(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<String, MnemoError> {
        let user_text = message.trim().to_string();
        let prompt = self.prepare(session_id, &user_text).await?;
        let response = self.backend.generate(&prompt).await?;
        self.finalize(session_id, &user_text, &response).await;
        info!(session_id = %session_id, chars = response.len(), "chat completed");
        Ok(response)
    }

    /// Handles one message, streaming events to the returned receiver.
    ///
    /// The event sequence is zero or more `Fragment`s followed by
    /// exactly one terminal `Done` or `Error`.
    pub fn chat_stream(
        self: &Arc<Self>,
        session_id: SessionId,
        message: String,
    ) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(32);
        let engine = Arc::clone(self);

        tokio::spawn(async move {
            match engine.run_stream(&session_id, &message, &tx).await {
                Ok(response) => {
                    let _ = tx.send(ChatEvent::Done { response }).await;
                }
                Err(e) => {
                    warn!(session_id = %session_id, state = %RelayState::Failed, error = %e, "chat failed");
                    let _ = tx
                        .send(ChatEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
            }
        });

        rx
    }

    async fn run_stream(
        &self,
        session_id: &SessionId,
        message: &str,
        tx: &mpsc::Sender<ChatEvent>,
    ) -> Result<String, MnemoError> {
        let user_text = message.trim().to_string();
        debug!(session_id = %session_id, state = %RelayState::Pending, "chat request accepted");

        let prompt = self.prepare(session_id, &user_text).await?;
        let mut stream = self.backend.generate_stream(&prompt).await?;
        debug!(session_id = %session_id, state = %RelayState::Streaming, "backend stream open");

        let mut accumulated = String::new();
        let mut forwarding = true;
        while let Some(item) = stream.next().await {
            let chunk = item?;
            if let Some(fragment) = chunk.response {
                if !fragment.is_empty() {
                    accumulated.push_str(&fragment);
                    if forwarding
                        && tx
                            .send(ChatEvent::Fragment { text: fragment })
                            .await
                            .is_err()
                    {
                        // Receiver gone: keep consuming so the exchange
                        // still records, stop forwarding.
                        debug!(session_id = %session_id, "event receiver dropped mid-stream");
                        forwarding = false;
                    }
                }
            }
            if chunk.done {
                break;
            }
        }

        if accumulated.trim().is_empty() {
            return Err(MnemoError::EmptyResponse);
        }

        self.finalize(session_id, &user_text, &accumulated).await;
        info!(
            session_id = %session_id,
            state = %RelayState::Completed,
            chars = accumulated.len(),
            "chat completed"
        );
        Ok(accumulated)
    }

    /// Validates the message, assembles the prompt, and appends the
    /// user turn to the conversation buffer.
    ///
    /// Context is assembled from state before this message, so the
    /// recent-conversation section never echoes the current message.
    async fn prepare(
        &self,
        session_id: &SessionId,
        user_text: &str,
    ) -> Result<String, MnemoError> {
        if user_text.is_empty() {
            return Err(MnemoError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        let conversation_summary = self
            .history
            .context_summary(session_id, self.context_turns)
            .await;

        let memory = match &self.memory {
            Some(store) => match store.relevant_memories(user_text, self.retrieval_limit).await {
                Ok(context) => Some(context),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "memory retrieval failed, continuing without");
                    None
                }
            },
            None => None,
        };

        let profile_summary = match self.profile.summary().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "profile load failed, continuing without");
                String::new()
            }
        };

        self.history.append(session_id, Role::User, user_text).await?;

        Ok(compose_prompt(&PromptParts {
            agent_name: &self.agent_name,
            conversation_summary: &conversation_summary,
            memory: memory.as_ref(),
            profile_summary: &profile_summary,
            message: user_text,
        }))
    }

    /// Records a successful exchange: assistant turn, conversation
    /// document, extracted facts. Runs once per completed request;
    /// individual write failures are logged and do not fail the chat.
    async fn finalize(&self, session_id: &SessionId, user_text: &str, response: &str) {
        if let Err(e) = self
            .history
            .append(session_id, Role::Assistant, response)
            .await
        {
            warn!(session_id = %session_id, error = %e, "failed to append assistant turn");
        }

        let Some(store) = &self.memory else {
            return;
        };

        if let Err(e) = store.add_conversation(session_id, user_text, response).await {
            warn!(session_id = %session_id, error = %e, "failed to record exchange in memory");
        }

        for fact in extract_facts(user_text, response, Utc::now()) {
            if let Err(e) = store.add_fact(&fact).await {
                warn!(session_id = %session_id, category = fact.category.as_str(), error = %e, "failed to store fact");
            }
        }
    }

    /// Full stored turn sequence for a session (display read).
    pub async fn history(&self, session_id: &SessionId) -> Vec<Turn> {
        self.history.history(session_id).await
    }

    /// The long-term memory store, when enabled.
    pub fn memory(&self) -> Option<&MemoryStore> {
        self.memory.as_deref()
    }
}
