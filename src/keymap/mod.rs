//! Keyboard shortcuts: chord value type, bindings and dispatch
//!
//! # Architecture
//!
//! ```text
//! winit key event → KeyboardShortcut → ShortcutManager (chord → id) → CommandRegistry::execute_command
//! ```
//!
//! The manager stores command ids as plain strings and never calls the
//! registry; [`dispatch_shortcut`] joins the two at the input router.
//!
//! # Loading Shortcuts
//!
//! ```ignore
//! let defaults = default_bindings(&registry.all_commands());
//! let mut manager = ShortcutManager::with_defaults(defaults);
//! if let Some(path) = config_paths::shortcuts_file() {
//!     let report = manager.load_from_file(path)?;
//! }
//! ```

mod defaults;
mod dispatch;
mod manager;
mod persistence;
mod types;
mod winit_adapter;

pub use defaults::{default_bindings, load_user_shortcuts, load_with_overrides};
pub use dispatch::{dispatch_global, dispatch_shortcut};
pub use manager::{BindError, ConflictPolicy, ShortcutManager};
pub use persistence::{
    parse_shortcuts_json, EntryError, LoadReport, PersistenceError, ShortcutEntry, SkippedEntry,
};
pub use types::{KeyCode, KeyboardShortcut, Modifiers, ShortcutParseError};
pub use winit_adapter::keystroke_from_winit;
