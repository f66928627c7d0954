// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo memories` command implementation.
//!
//! Prints stored facts grouped by category, then the most recent
//! remembered exchanges.

use std::sync::Arc;

use mnemo_config::MnemoConfig;
use mnemo_core::MnemoError;
use mnemo_memory::{HashEmbedder, MemoryStore};

/// Runs the `mnemo memories` command.
pub async fn run_memories(config: &MnemoConfig) -> Result<(), MnemoError> {
    if !config.memory.enabled {
        println!("long-term memory is disabled in configuration");
        return Ok(());
    }

    let store =
        MemoryStore::open(config.storage.memory_path(), Arc::new(HashEmbedder::new())).await?;

    let grouped = store.facts_by_category().await?;
    if grouped.is_empty() {
        println!("no facts remembered yet");
    } else {
        for (category, facts) in &grouped {
            println!("{} ({}):", category.as_str(), facts.len());
            for fact in facts {
                let confidence = fact
                    .confidence
                    .map(|c| c.as_str())
                    .unwrap_or("unknown");
                println!("  - {} [{confidence}]", fact.text);
            }
        }
    }

    let recent = store.recent_conversations(5).await?;
    if !recent.is_empty() {
        println!("\nrecent exchanges:");
        for doc in recent {
            println!(
                "  [{}] {}",
                doc.created_at.format("%Y-%m-%d %H:%M:%S"),
                doc.text.replace('\n', " | ")
            );
        }
    }

    Ok(())
}
