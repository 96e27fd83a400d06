//! Switchboard - unified command dispatch and UI generation core
//!
//! Every user-facing action (menu click, toolbar button, keyboard shortcut,
//! plugin invocation, palette pick) resolves to one registered [`Command`]
//! and runs through [`CommandRegistry::execute_command`].
//!
//! # Startup order
//!
//! 1. Register commands ([`CommandRegistry::global`], [`catalog::register_builtin`])
//! 2. Build the shortcut map ([`keymap::load_user_shortcuts`])
//! 3. Build menus and toolbars ([`ui::MenuBuilder`], [`ui::ToolbarBuilder`])
//! 4. Route key events through [`keymap::dispatch_shortcut`]

pub mod catalog;
pub mod command;
pub mod config;
pub mod config_paths;
pub mod keymap;
pub mod palette;
pub mod reactive;
pub mod tracing;
pub mod ui;

// Re-export commonly used types
pub use command::{Command, CommandRegistry, ExecutionResult};
pub use config::AppConfig;
pub use keymap::{KeyboardShortcut, ShortcutManager};
pub use reactive::{Attribute, Managed, ReactiveBroadcast, ReactiveObserver};
