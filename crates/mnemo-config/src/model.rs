// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject
//! unrecognized config keys at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to
/// sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Assistant identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Generation backend (Ollama) settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Durable storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Conversation buffer settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Long-term memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Assistant identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "mnemo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Generation backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every generation request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds. A single attempt is made per
    /// request; timeouts are surfaced to the caller, never retried.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Durable storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the history mapping, the memory database, and
    /// the profile file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("mnemo"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl StorageConfig {
    /// Path of the persisted conversation mapping.
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    /// Path of the semantic memory database.
    pub fn memory_path(&self) -> PathBuf {
        self.data_dir.join("memory.db")
    }

    /// Path of the profile key-value file.
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }
}

/// Conversation buffer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum turns retained per session; oldest are evicted first.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Number of recent turns rendered into the prompt context.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            context_turns: default_context_turns(),
        }
    }
}

fn default_max_history() -> usize {
    10
}

fn default_context_turns() -> usize {
    5
}

/// Long-term memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable the memory system. When false, no memory reads or writes
    /// occur and prompts carry no memory context.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// Top-k documents retrieved per collection for prompt context.
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            retrieval_limit: default_retrieval_limit(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_retrieval_limit() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MnemoConfig::default();
        assert_eq!(config.agent.name, "mnemo");
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.model, "llama3.2");
        assert_eq!(config.ollama.timeout_secs, 30);
        assert_eq!(config.history.max_history, 10);
        assert_eq!(config.history.context_turns, 5);
        assert!(config.memory.enabled);
        assert_eq!(config.memory.retrieval_limit, 3);
    }

    #[test]
    fn storage_paths_derive_from_data_dir() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/tmp/mnemo-test"),
        };
        assert_eq!(
            storage.history_path(),
            PathBuf::from("/tmp/mnemo-test/history.json")
        );
        assert_eq!(
            storage.memory_path(),
            PathBuf::from("/tmp/mnemo-test/memory.db")
        );
        assert_eq!(
            storage.profile_path(),
            PathBuf::from("/tmp/mnemo-test/profile.json")
        );
    }
}
