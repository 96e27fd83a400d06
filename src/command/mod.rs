//! Command descriptors and the central command registry
//!
//! # Architecture
//!
//! ```text
//! feature module ─register_command()─▶ CommandRegistry ◀─execute_command(id)─ menu / toolbar / keymap / palette
//! ```
//!
//! Plugins use the same `register_command` entry point; a plugin command is an
//! ordinary [`Command`] with `is_plugin_command` set.

mod descriptor;
mod icon;
mod registry;

pub use descriptor::{Command, ExecuteFn, PredicateFn};
pub use icon::{Bitmap, IconError, IconSet, IconSize, UnsupportedIconSize};
pub use registry::{CommandRegistry, ErrorHandler, ExecutionResult, RegistrationError};
