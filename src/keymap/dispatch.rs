//! Keyboard trigger path: chord -> command id -> registry
//!
//! This is the only place where the two halves meet. The shortcut manager
//! knows nothing about the registry and vice versa.

use crate::command::{CommandRegistry, ExecutionResult};

use super::manager::ShortcutManager;
use super::types::KeyboardShortcut;

/// Resolve a chord and execute the bound command
///
/// An unbound chord yields [`ExecutionResult::CommandNotFound`], the same
/// silent outcome as a binding whose command id is not registered.
pub fn dispatch_shortcut(
    manager: &ShortcutManager,
    registry: &CommandRegistry,
    shortcut: KeyboardShortcut,
) -> ExecutionResult {
    match manager.command_for_shortcut(&shortcut) {
        Some(command_id) => {
            tracing::trace!(key = %shortcut, command = %command_id, "Dispatching shortcut");
            registry.execute_command(command_id)
        }
        None => {
            tracing::trace!(key = %shortcut, "Unbound shortcut");
            ExecutionResult::CommandNotFound
        }
    }
}

/// [`dispatch_shortcut`] against the thread's global manager and registry
///
/// The manager borrow is released before the command runs, so the callback
/// may rebind shortcuts.
pub fn dispatch_global(shortcut: KeyboardShortcut) -> ExecutionResult {
    let command_id =
        ShortcutManager::with_global(|manager| manager.command_for_shortcut(&shortcut).map(str::to_owned));

    match command_id {
        Some(command_id) => CommandRegistry::global().execute_command(&command_id),
        None => ExecutionResult::CommandNotFound,
    }
}
