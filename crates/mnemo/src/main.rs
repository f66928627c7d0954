// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mnemo - a conversational assistant that remembers.
//!
//! This is the binary entry point for the Mnemo CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod chat;
mod history;
mod memories;

/// Mnemo - a conversational assistant that remembers.
#[derive(Parser, Debug)]
#[command(name = "mnemo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one message and stream the reply.
    Chat {
        /// Session the message belongs to.
        #[arg(long, default_value = "default")]
        session: String,
        /// The message text.
        message: Vec<String>,
    },
    /// Print the stored conversation buffer for a session.
    History {
        /// Session to display.
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Print what the assistant remembers long-term.
    Memories,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match mnemo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            mnemo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Chat { session, message }) => {
            chat::run_chat(&config, &session, &message.join(" ")).await
        }
        Some(Commands::History { session }) => history::run_history(&config, &session).await,
        Some(Commands::Memories) => memories::run_memories(&config).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(mnemo_core::MnemoError::Internal(format!(
                    "failed to render config: {e}"
                ))),
            }
        }
        None => {
            println!("mnemo: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("mnemo: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mnemo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
