// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across the Mnemo crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
///
/// Opaque string token minted by the caller on first contact. Sessions
/// never expire explicitly; they scope the conversation buffer and tag
/// long-term memory documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

/// Who produced a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering a turn into prompt context.
    pub fn context_label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One role-tagged message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Client-visible event emitted by the streaming relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    /// One incremental text fragment, forwarded in arrival order.
    Fragment { text: String },
    /// Terminal event: the full accumulated response.
    Done { response: String },
    /// Terminal event: the request failed with a human-readable cause.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn role_display_and_from_str_round_trip() {
        for role in [Role::User, Role::Assistant] {
            let parsed = Role::from_str(&role.to_string()).unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn role_context_labels() {
        assert_eq!(Role::User.context_label(), "You");
        assert_eq!(Role::Assistant.context_label(), "Assistant");
    }

    #[test]
    fn turn_serde_round_trip() {
        let turn = Turn::new(Role::User, "hello");
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(turn, back);
    }

    #[test]
    fn chat_event_tagged_serialization() {
        let frag = ChatEvent::Fragment {
            text: "Hi".to_string(),
        };
        let json = serde_json::to_string(&frag).unwrap();
        assert!(json.contains("\"event\":\"fragment\""));
    }
}
