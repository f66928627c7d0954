// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context composition and the streaming chat relay.

pub mod composer;
pub mod profile;
pub mod relay;

pub use composer::{compose_prompt, display_label, memory_summary, PromptParts};
pub use profile::ProfileStore;
pub use relay::{ChatEngine, RelayState};
