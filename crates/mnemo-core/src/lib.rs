// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo assistant engine.
//!
//! This crate provides the error taxonomy, shared domain types, and the
//! adapter trait seams used throughout the Mnemo workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemoError;
pub use traits::{EmbeddingAdapter, EmbeddingInput, EmbeddingOutput};
pub use types::{ChatEvent, Role, SessionId, Turn};
