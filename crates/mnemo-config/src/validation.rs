// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Figment guarantees type correctness; this layer checks value ranges
//! that serde cannot express.

use thiserror::Error;

use crate::model::MnemoConfig;

/// A single configuration validation failure.
#[derive(Debug, Error)]
#[error("config key `{key}`: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Validate a deserialized config, collecting all failures.
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.history.max_history == 0 {
        errors.push(ConfigError::new(
            "history.max_history",
            "must be at least 1",
        ));
    }

    if config.history.context_turns == 0 {
        errors.push(ConfigError::new(
            "history.context_turns",
            "must be at least 1",
        ));
    }

    if config.ollama.timeout_secs == 0 {
        errors.push(ConfigError::new("ollama.timeout_secs", "must be non-zero"));
    }

    if config.memory.retrieval_limit == 0 {
        errors.push(ConfigError::new(
            "memory.retrieval_limit",
            "must be at least 1",
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::new(
            "agent.log_level",
            format!(
                "`{}` is not one of trace, debug, info, warn, error",
                config.agent.log_level
            ),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Render validation errors to stderr, one line per failure.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("mnemo: {err}");
    }
}
