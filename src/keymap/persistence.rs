//! JSON persistence for shortcut bindings
//!
//! File format:
//!
//! ```json
//! { "shortcuts": [ { "key": "Ctrl+S", "command": "file.save" } ] }
//! ```
//!
//! A bare top-level array of entries is accepted as well, and so are the
//! legacy field names `shortcut` / `commandId`. Loading is per-entry tolerant:
//! a malformed entry is skipped with a warning and reported in the
//! [`LoadReport`], the rest of the file still loads.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::manager::ShortcutManager;
use super::types::{KeyboardShortcut, ShortcutParseError};

/// Errors that abort a whole save or load
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid shortcuts document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One persisted binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    #[serde(alias = "shortcut")]
    pub key: String,
    #[serde(alias = "commandId")]
    pub command: String,
}

#[derive(Serialize)]
struct ShortcutFileOut<'a> {
    shortcuts: &'a [ShortcutEntry],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ShortcutFileIn {
    Wrapped { shortcuts: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

/// Why a single entry was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Not an object with string `key` and `command` fields
    Malformed(String),
    InvalidShortcut(ShortcutParseError),
    EmptyCommand,
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::Malformed(msg) => write!(f, "malformed entry: {}", msg),
            EntryError::InvalidShortcut(e) => write!(f, "{}", e),
            EntryError::EmptyCommand => write!(f, "empty command id"),
        }
    }
}

/// An entry that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the file's entry list
    pub index: usize,
    pub reason: EntryError,
}

/// Outcome of a tolerant load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Parse a shortcuts document into valid bindings plus skipped entries
///
/// Only a document that is not JSON at all (or has the wrong top-level shape)
/// is an error.
pub fn parse_shortcuts_json(
    json: &str,
) -> Result<(Vec<(KeyboardShortcut, String)>, Vec<SkippedEntry>), PersistenceError> {
    let entries = match serde_json::from_str::<ShortcutFileIn>(json)? {
        ShortcutFileIn::Wrapped { shortcuts } => shortcuts,
        ShortcutFileIn::Bare(entries) => entries,
    };

    let mut bindings = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (index, value) in entries.into_iter().enumerate() {
        match parse_entry(value) {
            Ok(binding) => bindings.push(binding),
            Err(reason) => skipped.push(SkippedEntry { index, reason }),
        }
    }

    Ok((bindings, skipped))
}

fn parse_entry(value: serde_json::Value) -> Result<(KeyboardShortcut, String), EntryError> {
    let entry: ShortcutEntry =
        serde_json::from_value(value).map_err(|e| EntryError::Malformed(e.to_string()))?;
    let shortcut = entry
        .key
        .parse::<KeyboardShortcut>()
        .map_err(EntryError::InvalidShortcut)?;
    let command = entry.command.trim();
    if command.is_empty() {
        return Err(EntryError::EmptyCommand);
    }
    Ok((shortcut, command.to_string()))
}

impl ShortcutManager {
    /// Serialize the current bindings (in chord order)
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        let entries: Vec<ShortcutEntry> = self
            .bindings()
            .map(|(shortcut, command)| ShortcutEntry {
                key: shortcut.to_string(),
                command: command.to_string(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&ShortcutFileOut {
            shortcuts: &entries,
        })?)
    }

    /// Write the current bindings, creating the parent directory if needed
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let write_err = |source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, json).map_err(write_err)?;

        tracing::info!("Saved {} shortcuts to {}", self.len(), path.display());
        Ok(())
    }

    /// Merge bindings from a JSON document into the current map
    ///
    /// File entries override existing bindings for the same chord regardless
    /// of the conflict policy; unknown command ids are bound as-is.
    pub fn load_from_str(&mut self, json: &str) -> Result<LoadReport, PersistenceError> {
        let (bindings, skipped) = parse_shortcuts_json(json)?;

        for entry in &skipped {
            tracing::warn!("Skipping shortcut entry {}: {}", entry.index, entry.reason);
        }

        let loaded = bindings.len();
        for (shortcut, command) in bindings {
            self.insert_binding(shortcut, command);
        }

        Ok(LoadReport { loaded, skipped })
    }

    /// Merge bindings from a shortcuts file into the current map
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, PersistenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let report = self.load_from_str(&json)?;
        tracing::info!(
            "Loaded {} shortcuts from {} ({} skipped)",
            report.loaded,
            path.display(),
            report.skipped.len()
        );
        Ok(report)
    }
}
