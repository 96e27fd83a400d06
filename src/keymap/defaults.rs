//! Default shortcut map and user override loading
//!
//! Defaults come from the `shortcut` field of registered commands. User
//! overrides live in `~/.config/switchboard/shortcuts.json` and are merged
//! on top.

use std::path::Path;

use crate::command::Command;
use crate::config_paths;

use super::manager::ShortcutManager;
use super::persistence::LoadReport;
use super::types::KeyboardShortcut;

/// Collect `(shortcut, id)` pairs from command descriptors
///
/// When two commands declare the same chord the later one wins, matching
/// the replace semantics of [`ShortcutManager::bind_shortcut`].
pub fn default_bindings<'a>(
    commands: impl IntoIterator<Item = &'a Command>,
) -> Vec<(KeyboardShortcut, String)> {
    let mut bindings: Vec<(KeyboardShortcut, String)> = Vec::new();
    for command in commands {
        let Some(shortcut) = command.shortcut else {
            continue;
        };
        if let Some(existing) = bindings.iter_mut().find(|(s, _)| *s == shortcut) {
            tracing::debug!(
                key = %shortcut,
                previous = %existing.1,
                command = %command.id,
                "Default shortcut declared twice"
            );
            existing.1 = command.id.clone();
        } else {
            bindings.push((shortcut, command.id.clone()));
        }
    }
    bindings
}

/// Build a manager from defaults, then merge a user shortcuts file
///
/// A missing file is normal; an unreadable or invalid one is logged and the
/// defaults stay in effect.
pub fn load_with_overrides(
    defaults: Vec<(KeyboardShortcut, String)>,
    user_file: Option<&Path>,
) -> (ShortcutManager, Option<LoadReport>) {
    let mut manager = ShortcutManager::with_defaults(defaults);

    let Some(path) = user_file else {
        return (manager, None);
    };
    if !path.exists() {
        tracing::debug!("No user shortcuts at {}", path.display());
        return (manager, None);
    }

    match manager.load_from_file(path) {
        Ok(report) => (manager, Some(report)),
        Err(e) => {
            tracing::warn!("Failed to load user shortcuts from {}: {}", path.display(), e);
            (manager, None)
        }
    }
}

/// [`load_with_overrides`] using the standard user shortcuts location
pub fn load_user_shortcuts(defaults: Vec<(KeyboardShortcut, String)>) -> ShortcutManager {
    let path = config_paths::shortcuts_file();
    load_with_overrides(defaults, path.as_deref()).0
}
