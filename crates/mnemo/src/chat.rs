// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo chat` command implementation.
//!
//! Sends one message through the chat engine and prints fragments as
//! they arrive, so long generations render progressively.

use std::io::Write;
use std::sync::Arc;

use mnemo_agent::ChatEngine;
use mnemo_config::MnemoConfig;
use mnemo_core::{ChatEvent, MnemoError, SessionId};

/// Runs the `mnemo chat` command.
pub async fn run_chat(
    config: &MnemoConfig,
    session: &str,
    message: &str,
) -> Result<(), MnemoError> {
    let engine = Arc::new(ChatEngine::from_config(config).await?);
    let mut rx = engine.chat_stream(SessionId::from(session), message.to_string());

    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        match event {
            ChatEvent::Fragment { text } => {
                print!("{text}");
                let _ = stdout.flush();
            }
            ChatEvent::Done { .. } => {
                println!();
            }
            ChatEvent::Error { message } => {
                println!();
                return Err(MnemoError::Internal(message));
            }
        }
    }

    Ok(())
}
