//! Shortcut bindings: chord -> command id
//!
//! The manager only stores ids. It never calls into the command registry, so
//! a binding may reference a command that is registered later (or replaced);
//! resolution happens at dispatch time.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::KeyboardShortcut;

/// What [`ShortcutManager::bind_shortcut`] does when the chord is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Last bind wins; the previous owner is returned to the caller
    #[default]
    Replace,
    /// Refuse to bind and report the current owner
    Reject,
}

/// Errors returned by [`ShortcutManager::bind_shortcut`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("command id must not be empty")]
    EmptyCommandId,
    #[error("{shortcut} is already bound to '{existing}'")]
    Conflict {
        shortcut: KeyboardShortcut,
        existing: String,
    },
}

thread_local! {
    static GLOBAL_SHORTCUTS: RefCell<ShortcutManager> = RefCell::new(ShortcutManager::new());
}

/// Keyboard shortcut bindings with a separately captured default map
#[derive(Debug, Clone, Default)]
pub struct ShortcutManager {
    bindings: BTreeMap<KeyboardShortcut, String>,
    defaults: BTreeMap<KeyboardShortcut, String>,
    policy: ConflictPolicy,
}

impl ShortcutManager {
    /// Create an empty manager (no defaults, [`ConflictPolicy::Replace`])
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager whose current and default bindings are `defaults`
    pub fn with_defaults<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (KeyboardShortcut, S)>,
        S: Into<String>,
    {
        let mut manager = Self::new();
        manager.set_defaults(defaults);
        manager.reset_to_defaults();
        manager
    }

    /// Run `f` against the shortcut manager of the current (UI) thread
    ///
    /// Do not dispatch commands from inside `f`; copy the id out first
    /// (see [`dispatch_global`](super::dispatch_global)).
    pub fn with_global<R>(f: impl FnOnce(&mut ShortcutManager) -> R) -> R {
        GLOBAL_SHORTCUTS.with(|manager| f(&mut manager.borrow_mut()))
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn set_conflict_policy(&mut self, policy: ConflictPolicy) {
        self.policy = policy;
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Bind a chord to a command id
    ///
    /// Under [`ConflictPolicy::Replace`] an existing binding is overwritten and
    /// its command id returned. Re-binding a chord to the id it already has is
    /// a no-op returning `Ok(None)`.
    pub fn bind_shortcut(
        &mut self,
        shortcut: KeyboardShortcut,
        command_id: impl Into<String>,
    ) -> Result<Option<String>, BindError> {
        let command_id = command_id.into();
        if command_id.trim().is_empty() {
            return Err(BindError::EmptyCommandId);
        }
        let shortcut = shortcut.normalized();

        match self.bindings.get(&shortcut) {
            Some(existing) if *existing == command_id => return Ok(None),
            Some(existing) if self.policy == ConflictPolicy::Reject => {
                return Err(BindError::Conflict {
                    shortcut,
                    existing: existing.clone(),
                });
            }
            _ => {}
        }

        let previous = self.bindings.insert(shortcut, command_id);
        if let Some(ref previous) = previous {
            tracing::debug!(
                key = %shortcut,
                previous = %previous,
                command = %self.bindings[&shortcut],
                "Shortcut rebound"
            );
        }
        Ok(previous)
    }

    /// Remove a binding, returning the command id it pointed to
    pub fn unbind_shortcut(&mut self, shortcut: &KeyboardShortcut) -> Option<String> {
        self.bindings.remove(&shortcut.normalized())
    }

    /// Insert without consulting the conflict policy (used by file loading)
    pub(crate) fn insert_binding(&mut self, shortcut: KeyboardShortcut, command_id: String) {
        let shortcut = shortcut.normalized();
        if let Some(previous) = self.bindings.insert(shortcut, command_id) {
            tracing::debug!(key = %shortcut, previous = %previous, "Shortcut overridden");
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    pub fn command_for_shortcut(&self, shortcut: &KeyboardShortcut) -> Option<&str> {
        self.bindings.get(&shortcut.normalized()).map(String::as_str)
    }

    pub fn is_bound(&self, shortcut: &KeyboardShortcut) -> bool {
        self.bindings.contains_key(&shortcut.normalized())
    }

    /// Would binding this chord collide with an existing binding?
    ///
    /// Matching is exact, so at most one owner exists.
    pub fn has_conflict(&self, shortcut: &KeyboardShortcut) -> bool {
        self.is_bound(shortcut)
    }

    /// Command ids that currently own this chord
    pub fn conflicts(&self, shortcut: &KeyboardShortcut) -> Vec<String> {
        self.bindings
            .get(&shortcut.normalized())
            .into_iter()
            .cloned()
            .collect()
    }

    /// All chords bound to a command, in chord order
    pub fn shortcuts_for_command(&self, command_id: &str) -> Vec<KeyboardShortcut> {
        self.bindings
            .iter()
            .filter(|(_, id)| id.as_str() == command_id)
            .map(|(shortcut, _)| *shortcut)
            .collect()
    }

    /// All bindings in chord order
    pub fn bindings(&self) -> impl Iterator<Item = (&KeyboardShortcut, &str)> {
        self.bindings.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove every binding (defaults stay captured)
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    // ========================================================================
    // Defaults
    // ========================================================================

    /// Capture the built-in default map used by [`reset_to_defaults`](Self::reset_to_defaults)
    pub fn set_defaults<I, S>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (KeyboardShortcut, S)>,
        S: Into<String>,
    {
        self.defaults = defaults
            .into_iter()
            .map(|(shortcut, id)| (shortcut.normalized(), id.into()))
            .collect();
    }

    pub fn defaults(&self) -> impl Iterator<Item = (&KeyboardShortcut, &str)> {
        self.defaults.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Discard user overrides and restore the captured default map
    pub fn reset_to_defaults(&mut self) {
        self.bindings = self.defaults.clone();
        tracing::info!("Shortcuts reset to defaults ({} bindings)", self.bindings.len());
    }

    /// Bindings that differ from the defaults (added or rebound chords)
    pub fn overrides(&self) -> impl Iterator<Item = (&KeyboardShortcut, &str)> {
        self.bindings
            .iter()
            .filter(|(k, v)| self.defaults.get(*k) != Some(*v))
            .map(|(k, v)| (k, v.as_str()))
    }
}
