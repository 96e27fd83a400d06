//! Built-in command catalog
//!
//! The standard file/edit/format/view/help commands every host application
//! starts with. Their callbacks only log and flip local toggle state; a real
//! application registers its own commands with the same ids to replace them.

use std::cell::Cell;
use std::rc::Rc;

use crate::command::{Command, CommandRegistry, RegistrationError};
use crate::keymap::{default_bindings, KeyCode, KeyboardShortcut, Modifiers};

fn action(id: &str, label: &str, tooltip: &str) -> Command {
    let name = id.to_string();
    Command::new(id, move || {
        tracing::info!(command = %name, "Executed");
        Ok(())
    })
    .label(label)
    .tooltip(tooltip)
}

fn toggle(id: &str, label: &str, tooltip: &str, initial: bool) -> Command {
    let state = Rc::new(Cell::new(initial));
    let flip = state.clone();
    let name = id.to_string();
    Command::new(id, move || {
        flip.set(!flip.get());
        tracing::info!(command = %name, checked = flip.get(), "Toggled");
        Ok(())
    })
    .label(label)
    .tooltip(tooltip)
    .checked_when(move || state.get())
}

fn key(code: KeyCode, mods: Modifiers) -> KeyboardShortcut {
    KeyboardShortcut::new(code, mods)
}

/// Fresh descriptors for the built-in commands, in menu order
pub fn builtin_commands() -> Vec<Command> {
    vec![
        // File
        action("file.new", "New", "Create a new document")
            .shortcut(KeyboardShortcut::ctrl('n'))
            .show_in_toolbar(true),
        action("file.open", "Open...", "Open an existing document")
            .shortcut(KeyboardShortcut::ctrl('o'))
            .show_in_toolbar(true),
        action("file.save", "Save", "Save the current document")
            .shortcut(KeyboardShortcut::ctrl('s'))
            .show_in_toolbar(true),
        action("file.save_as", "Save As...", "Save under a new name")
            .shortcut(KeyboardShortcut::ctrl_shift('s')),
        action("file.close", "Close", "Close the current document")
            .shortcut(KeyboardShortcut::ctrl('w')),
        action("file.exit", "Exit", "Quit the application").shortcut(key(KeyCode::F(4), Modifiers::ALT)),
        // Edit
        action("edit.undo", "Undo", "Undo the last change")
            .shortcut(KeyboardShortcut::ctrl('z'))
            .show_in_toolbar(true),
        action("edit.redo", "Redo", "Redo the last undone change")
            .shortcut(KeyboardShortcut::ctrl('y'))
            .show_in_toolbar(true),
        action("edit.cut", "Cut", "Cut the selection")
            .shortcut(KeyboardShortcut::ctrl('x'))
            .show_in_toolbar(true),
        action("edit.copy", "Copy", "Copy the selection")
            .shortcut(KeyboardShortcut::ctrl('c'))
            .show_in_toolbar(true),
        action("edit.paste", "Paste", "Paste from the clipboard")
            .shortcut(KeyboardShortcut::ctrl('v'))
            .show_in_toolbar(true),
        action("edit.select_all", "Select All", "Select the whole document")
            .shortcut(KeyboardShortcut::ctrl('a')),
        action("edit.find", "Find...", "Search in the document").shortcut(KeyboardShortcut::ctrl('f')),
        action("edit.replace", "Replace...", "Search and replace")
            .shortcut(KeyboardShortcut::ctrl('h')),
        // Format
        toggle("format.bold", "Bold", "Toggle bold", false)
            .shortcut(KeyboardShortcut::ctrl('b'))
            .show_in_toolbar(true),
        toggle("format.italic", "Italic", "Toggle italic", false)
            .shortcut(KeyboardShortcut::ctrl('i'))
            .show_in_toolbar(true),
        toggle("format.underline", "Underline", "Toggle underline", false)
            .shortcut(KeyboardShortcut::ctrl('u'))
            .show_in_toolbar(true),
        action("format.clear", "Clear Formatting", "Remove character formatting")
            .shortcut(key(KeyCode::Space, Modifiers::CTRL)),
        // View
        toggle("view.word_wrap", "Word Wrap", "Wrap long lines", true)
            .shortcut(key(KeyCode::Char('z'), Modifiers::ALT)),
        toggle("view.status_bar", "Status Bar", "Show the status bar", true),
        action("view.zoom_in", "Zoom In", "Increase the zoom level")
            .shortcut(KeyboardShortcut::ctrl('=')),
        action("view.zoom_out", "Zoom Out", "Decrease the zoom level")
            .shortcut(KeyboardShortcut::ctrl('-')),
        action("view.full_screen", "Full Screen", "Toggle full screen")
            .shortcut(KeyboardShortcut::key(KeyCode::F(11))),
        // Help
        action("help.documentation", "Documentation", "Open the user manual")
            .shortcut(KeyboardShortcut::key(KeyCode::F(1))),
        action("help.about", "About", "About this application"),
    ]
}

/// Register every built-in command
pub fn register_builtin(registry: &CommandRegistry) -> Result<(), RegistrationError> {
    let commands = builtin_commands();
    let count = commands.len();
    for command in commands {
        registry.register_command(command)?;
    }
    tracing::debug!("Registered {} built-in commands", count);
    Ok(())
}

/// Default shortcut map declared by the built-in commands
pub fn default_shortcuts() -> Vec<(KeyboardShortcut, String)> {
    default_bindings(&builtin_commands())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_unique() {
        let commands = builtin_commands();
        let ids: HashSet<_> = commands.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), commands.len());
    }

    #[test]
    fn test_default_shortcuts_unique_chords() {
        let shortcuts = default_shortcuts();
        let chords: HashSet<_> = shortcuts.iter().map(|(s, _)| *s).collect();
        assert_eq!(chords.len(), shortcuts.len());
        assert!(shortcuts.contains(&(KeyboardShortcut::ctrl('s'), "file.save".to_string())));
    }

    #[test]
    fn test_toggle_flips_checked_state() {
        let registry = CommandRegistry::new();
        register_builtin(&registry).unwrap();

        assert!(registry.is_checked("view.word_wrap"));
        assert!(registry.execute_command("view.word_wrap").is_success());
        assert!(!registry.is_checked("view.word_wrap"));
        assert!(!registry.is_checked("file.save"));
    }
}
