// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo history` command implementation.

use mnemo_agent::display_label;
use mnemo_config::MnemoConfig;
use mnemo_core::{MnemoError, SessionId};
use mnemo_history::ConversationLog;

/// Runs the `mnemo history` command.
pub async fn run_history(config: &MnemoConfig, session: &str) -> Result<(), MnemoError> {
    let log =
        ConversationLog::load(config.storage.history_path(), config.history.max_history).await?;

    let turns = log.history(&SessionId::from(session)).await;
    if turns.is_empty() {
        println!("no history for session '{session}'");
        return Ok(());
    }

    for turn in turns {
        println!(
            "[{}] {}: {}",
            turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
            display_label(turn.role),
            turn.content
        );
    }
    Ok(())
}
