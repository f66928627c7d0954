// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly from context sections.
//!
//! Sections are rendered independently, then joined in a fixed order
//! with empty sections omitted. The ordering is part of the contract:
//! framing, recent conversation, remembered facts, profile, current
//! message, behavioral instructions.

use mnemo_core::types::Role;
use mnemo_memory::types::{Confidence, MemoryContext};

/// Inputs for one prompt assembly. Empty strings mean "omit section".
#[derive(Debug, Default)]
pub struct PromptParts<'a> {
    /// Assistant name used in the framing sentence.
    pub agent_name: &'a str,
    /// Pre-rendered recent-conversation section (carries its own header).
    pub conversation_summary: &'a str,
    /// Retrieved long-term memory, if the memory system is enabled.
    pub memory: Option<&'a MemoryContext>,
    /// Pre-rendered profile section (carries its own header).
    pub profile_summary: &'a str,
    /// The message being answered.
    pub message: &'a str,
}

/// Composes the full prompt from the given parts.
pub fn compose_prompt(parts: &PromptParts) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!(
        "You are {}, a helpful personal assistant who remembers past conversations.",
        parts.agent_name
    ));

    if !parts.conversation_summary.is_empty() {
        sections.push(parts.conversation_summary.to_string());
    }

    if let Some(memory) = parts.memory {
        let remembered = memory_summary(memory);
        if !remembered.is_empty() {
            sections.push(remembered);
        }
    }

    if !parts.profile_summary.is_empty() {
        sections.push(parts.profile_summary.to_string());
    }

    sections.push(format!("Current message: {}", parts.message));

    sections.push(
        "Respond naturally and concisely to the current message. Use what you \
         remember only when it is relevant; do not recite it back."
            .to_string(),
    );

    sections.join("\n\n")
}

/// Renders retrieved memory as a "What I remember about you" section.
///
/// Only high-confidence facts are listed. The single most relevant past
/// exchange follows, both sides included. Empty when neither is
/// available.
pub fn memory_summary(memory: &MemoryContext) -> String {
    let mut lines: Vec<String> = Vec::new();

    for fact in &memory.facts {
        if fact.confidence == Some(Confidence::High) {
            lines.push(format!("- {}", fact.text));
        }
    }

    if let Some(conversation) = memory.conversations.first() {
        lines.push(format!(
            "- Previously discussed: {}",
            conversation.text.replace('\n', "; ")
        ));
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut out = vec!["What I remember about you:".to_string()];
    out.extend(lines);
    out.join("\n")
}

/// Display label for a role in CLI output.
pub fn display_label(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "bot",
    }
}
