// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only user profile loaded from a JSON file.
//!
//! The profile is edited out of band; this module only loads it and
//! renders the known fields into a prompt section. A missing file means
//! an empty profile.

use std::path::PathBuf;

use serde_json::{Map, Value};

use mnemo_core::MnemoError;

/// Profile fields rendered into the prompt, in display order.
const PROFILE_FIELDS: &[(&str, &str)] = &[
    ("name", "Name"),
    ("location", "Location"),
    ("occupation", "Occupation"),
    ("interests", "Interests"),
    ("goals", "Goals"),
    ("preferences", "Preferences"),
];

/// Read-only view over the profile file.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the profile mapping. A missing file is an empty profile.
    pub async fn load(&self) -> Result<Map<String, Value>, MnemoError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| MnemoError::Storage { source: Box::new(e) }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(MnemoError::Storage { source: Box::new(e) }),
        }
    }

    /// Renders known profile fields as a prompt section.
    ///
    /// Returns an empty string when no known field is present, so the
    /// composer can omit the section.
    pub async fn summary(&self) -> Result<String, MnemoError> {
        let profile = self.load().await?;

        let mut lines: Vec<String> = Vec::new();
        for (key, label) in PROFILE_FIELDS {
            if let Some(value) = profile.get(*key) {
                if let Some(rendered) = render_value(value) {
                    lines.push(format!("{label}: {rendered}"));
                }
            }
        }

        if lines.is_empty() {
            return Ok(String::new());
        }

        let mut out = vec!["Profile Information:".to_string()];
        out.extend(lines);
        Ok(out.join("\n"))
    }
}

/// Renders a profile value: strings as-is, arrays comma-joined.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}
