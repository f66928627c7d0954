// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NDJSON stream parser for streaming generate responses.
//!
//! Converts a reqwest response byte stream into typed [`GenerateChunk`]
//! records, one per newline-delimited JSON line. Line framing comes from
//! `tokio-util`'s [`LinesCodec`] so records split across network reads
//! are reassembled before parsing.

use std::pin::Pin;

use futures::stream::{Stream, StreamExt};
use futures::TryStreamExt;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;
use tracing::warn;

use mnemo_core::MnemoError;

use crate::types::GenerateChunk;

/// Parses a reqwest streaming response into a stream of [`GenerateChunk`]s.
///
/// Empty lines are skipped. A line that is not valid JSON is logged and
/// skipped rather than failing the stream; transport errors terminate
/// the stream with an error item.
pub fn parse_ndjson_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<GenerateChunk, MnemoError>> + Send>> {
    let byte_stream = response.bytes_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(byte_stream);
    let lines = FramedRead::new(reader, LinesCodec::new());

    let mapped = lines.filter_map(|result| async move {
        match result {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match serde_json::from_str::<GenerateChunk>(trimmed) {
                    Ok(chunk) => Some(Ok(chunk)),
                    Err(e) => {
                        warn!(error = %e, "skipping malformed stream record");
                        None
                    }
                }
            }
            Err(e) => Some(Err(MnemoError::Backend {
                message: format!("stream read error: {e}"),
                source: Some(Box::new(e)),
            })),
        }
    });

    Box::pin(mapped)
}
