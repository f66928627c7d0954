// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic fact extraction from a completed exchange.
//!
//! A pure pattern scan: no model call, no store access. The trigger
//! tables are fixed configuration data so they can be tuned and tested
//! independently of the scan itself. Substring matching over
//! unnormalized text deliberately mirrors the store's write path --
//! duplicates from overlapping phrases are preserved here and resolved
//! by retrieval ranking, not deduplicated at this layer.

use chrono::{DateTime, Utc};

use crate::types::{Confidence, FactCandidate, FactCategory, FactSource};

/// Trigger phrases per category, scanned in this order against the
/// lower-cased user message.
pub const FACT_PATTERNS: &[(FactCategory, &[&str])] = &[
    (
        FactCategory::Preference,
        &[
            "i like",
            "i love",
            "i enjoy",
            "i prefer",
            "i'm fond of",
            "i don't like",
            "i hate",
            "i dislike",
        ],
    ),
    (
        FactCategory::Habit,
        &[
            "i usually",
            "i always",
            "i never",
            "i sometimes",
            "every day",
            "every week",
            "normally i",
        ],
    ),
    (
        FactCategory::PersonalInfo,
        &[
            "i am",
            "i'm",
            "my name is",
            "i work",
            "i live",
            "my job",
            "my home",
            "my family",
        ],
    ),
    (
        FactCategory::Skill,
        &[
            "i can",
            "i know how",
            "i'm good at",
            "i'm skilled in",
            "i'm experienced in",
            "i've learned",
        ],
    ),
    (
        FactCategory::Goal,
        &[
            "i want to",
            "i plan to",
            "i hope to",
            "i'm trying to",
            "my goal",
            "i aim to",
            "i wish to",
        ],
    ),
    (
        FactCategory::Experience,
        &[
            "i've been",
            "i have been",
            "i used to",
            "in my experience",
            "i remember when",
        ],
    ),
];

/// Identity phrases that raise extraction confidence to high.
pub const IDENTITY_PHRASES: &[&str] = &["i am", "i'm", "my name is", "i live", "i work"];

/// Phrases in an assistant response that restate something the user said.
pub const CONFIRMATION_PHRASES: &[&str] = &[
    "you mentioned that",
    "you said",
    "as you told me",
    "based on what you said",
    "you indicated",
];

/// Extract fact candidates from a completed exchange.
///
/// Deterministic and side-effect-free: for fixed inputs and `now`, the
/// returned list is always identical. A sentence may appear more than
/// once when it matches multiple trigger phrases within the same
/// category scan.
pub fn extract_facts(
    user_text: &str,
    assistant_text: &str,
    now: DateTime<Utc>,
) -> Vec<FactCandidate> {
    let mut facts = Vec::new();

    let lower_msg = user_text.to_lowercase();
    for (category, patterns) in FACT_PATTERNS {
        for pattern in *patterns {
            if !lower_msg.contains(pattern) {
                continue;
            }
            for sentence in user_text.split('.') {
                if sentence.to_lowercase().contains(pattern) {
                    facts.push(FactCandidate {
                        content: sentence.trim().to_string(),
                        category: *category,
                        source: FactSource::UserMessage,
                        confidence: if IDENTITY_PHRASES.contains(pattern) {
                            Confidence::High
                        } else {
                            Confidence::Medium
                        },
                        timestamp: now,
                    });
                }
            }
        }
    }

    let lower_resp = assistant_text.to_lowercase();
    for pattern in CONFIRMATION_PHRASES {
        if !lower_resp.contains(pattern) {
            continue;
        }
        for sentence in assistant_text.split('.') {
            if sentence.to_lowercase().contains(pattern) {
                facts.push(FactCandidate {
                    content: sentence.trim().to_string(),
                    category: FactCategory::Confirmation,
                    source: FactSource::AssistantResponse,
                    confidence: Confidence::Medium,
                    timestamp: now,
                });
            }
        }
    }

    facts
}
