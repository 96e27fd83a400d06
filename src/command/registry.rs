//! Central command catalog and the single execution choke-point
//!
//! Every trigger path (menu entry, toolbar button, keyboard chord, palette)
//! ends in [`CommandRegistry::execute_command`]. The registry is also the
//! fault boundary between command callbacks and the UI event loop: errors and
//! panics raised by a callback are reported and turned into
//! [`ExecutionResult::ExecutionFailed`], never propagated.
//!
//! The registry lives on the UI thread and is shared as `Rc<CommandRegistry>`.
//! No internal borrow is held while callbacks run, so a callback may register,
//! unregister or execute other commands.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use indexmap::IndexMap;

use super::descriptor::{Command, PredicateFn};

/// Outcome of [`CommandRegistry::execute_command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionResult {
    /// The callback ran and returned normally
    Success,
    /// No command with that id is registered
    CommandNotFound,
    /// The command's `is_enabled` gate returned false
    CommandDisabled,
    /// The callback returned an error or panicked
    ExecutionFailed,
}

impl ExecutionResult {
    pub fn is_success(self) -> bool {
        self == ExecutionResult::Success
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExecutionResult::Success => "success",
            ExecutionResult::CommandNotFound => "command not found",
            ExecutionResult::CommandDisabled => "command disabled",
            ExecutionResult::ExecutionFailed => "execution failed",
        };
        f.write_str(text)
    }
}

/// Receives `(command_id, error)` whenever a callback fails
pub type ErrorHandler = Rc<dyn Fn(&str, &anyhow::Error)>;

/// Errors rejected at registration time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("command id must not be empty")]
    EmptyId,
}

thread_local! {
    static GLOBAL_REGISTRY: Rc<CommandRegistry> = Rc::new(CommandRegistry::new());
}

/// Catalog of all registered commands, in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: RefCell<IndexMap<String, Command>>,
    error_handler: RefCell<Option<ErrorHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry for the current (UI) thread
    ///
    /// Created lazily on first access; must exist before any menu or toolbar
    /// is built.
    pub fn global() -> Rc<CommandRegistry> {
        GLOBAL_REGISTRY.with(Rc::clone)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Insert a command, replacing any previous command with the same id
    ///
    /// A replaced command keeps its original position in registration order.
    pub fn register_command(&self, command: Command) -> Result<(), RegistrationError> {
        if command.id.trim().is_empty() {
            return Err(RegistrationError::EmptyId);
        }

        let id = command.id.clone();
        let replaced = self.commands.borrow_mut().insert(id.clone(), command);
        if replaced.is_some() {
            tracing::debug!(command = %id, "Replaced registered command");
        } else {
            tracing::trace!(command = %id, "Registered command");
        }
        Ok(())
    }

    /// Remove a command; unknown ids are ignored
    ///
    /// Returns true if a command was removed.
    pub fn unregister_command(&self, id: &str) -> bool {
        let removed = self.commands.borrow_mut().shift_remove(id).is_some();
        if removed {
            tracing::debug!(command = %id, "Unregistered command");
        }
        removed
    }

    /// Remove every command contributed by a plugin, returning how many were removed
    pub fn unregister_plugin(&self, plugin_id: &str) -> usize {
        let mut commands = self.commands.borrow_mut();
        let before = commands.len();
        commands.retain(|_, cmd| !(cmd.is_plugin_command && cmd.plugin_id == plugin_id));
        let removed = before - commands.len();
        if removed > 0 {
            tracing::info!(plugin = %plugin_id, removed, "Unregistered plugin commands");
        }
        removed
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Look up a command by id
    pub fn get_command(&self, id: &str) -> Option<Command> {
        self.commands.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.borrow().contains_key(id)
    }

    /// Commands in one category, in registration order
    pub fn commands_by_category(&self, category: &str) -> Vec<Command> {
        self.commands
            .borrow()
            .values()
            .filter(|cmd| cmd.category == category)
            .cloned()
            .collect()
    }

    /// All commands, in registration order
    pub fn all_commands(&self) -> Vec<Command> {
        self.commands.borrow().values().cloned().collect()
    }

    /// Commands registered by one plugin
    pub fn plugin_commands(&self, plugin_id: &str) -> Vec<Command> {
        self.commands
            .borrow()
            .values()
            .filter(|cmd| cmd.is_plugin_command && cmd.plugin_id == plugin_id)
            .cloned()
            .collect()
    }

    /// Unique, sorted, non-empty category names
    pub fn categories(&self) -> Vec<String> {
        let categories: BTreeSet<String> = self
            .commands
            .borrow()
            .values()
            .filter(|cmd| !cmd.category.is_empty())
            .map(|cmd| cmd.category.clone())
            .collect();
        categories.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Remove all commands (the error handler is kept)
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Execute a command by id
    ///
    /// Unknown and disabled commands are silent, expected outcomes. A failing
    /// callback is reported to the error handler (or logged) exactly once.
    pub fn execute_command(&self, id: &str) -> ExecutionResult {
        // Clone the callbacks out so no borrow is held while they run
        let found = self
            .commands
            .borrow()
            .get(id)
            .map(|cmd| (cmd.execute.clone(), cmd.is_enabled.clone()));

        let Some((execute, is_enabled)) = found else {
            tracing::debug!(command = %id, "Ignoring unknown command");
            return ExecutionResult::CommandNotFound;
        };

        if !evaluate(id, is_enabled.as_ref(), true) {
            tracing::debug!(command = %id, "Ignoring disabled command");
            return ExecutionResult::CommandDisabled;
        }

        let error = match panic::catch_unwind(AssertUnwindSafe(|| execute())) {
            Ok(Ok(())) => {
                tracing::trace!(command = %id, "Command executed");
                return ExecutionResult::Success;
            }
            Ok(Err(error)) => error,
            Err(payload) => anyhow::anyhow!("command panicked: {}", panic_message(&*payload)),
        };

        self.report_failure(id, &error);
        ExecutionResult::ExecutionFailed
    }

    /// True if the command exists and its enabled gate passes
    pub fn can_execute(&self, id: &str) -> bool {
        let gate = match self.commands.borrow().get(id) {
            Some(cmd) => cmd.is_enabled.clone(),
            None => return false,
        };
        evaluate(id, gate.as_ref(), true)
    }

    /// Toggle state for checkable commands; false when unknown or not checkable
    pub fn is_checked(&self, id: &str) -> bool {
        let query = match self.commands.borrow().get(id) {
            Some(cmd) => cmd.is_checked.clone(),
            None => return false,
        };
        evaluate(id, query.as_ref(), false)
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Route execution failures to a custom handler instead of the log
    pub fn set_error_handler(&self, handler: impl Fn(&str, &anyhow::Error) + 'static) {
        *self.error_handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Restore the default logging-only behaviour
    pub fn clear_error_handler(&self) {
        self.error_handler.borrow_mut().take();
    }

    pub fn has_error_handler(&self) -> bool {
        self.error_handler.borrow().is_some()
    }

    fn report_failure(&self, id: &str, error: &anyhow::Error) {
        let handler = self.error_handler.borrow().clone();
        match handler {
            Some(handler) => handler(id, error),
            None => tracing::error!(command = %id, "Command execution failed: {:#}", error),
        }
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.len())
            .field("error_handler", &self.has_error_handler())
            .finish()
    }
}

/// Run a state predicate inside the fault boundary
fn evaluate(id: &str, predicate: Option<&PredicateFn>, default: bool) -> bool {
    let Some(predicate) = predicate else {
        return default;
    };
    match panic::catch_unwind(AssertUnwindSafe(|| predicate())) {
        Ok(value) => value,
        Err(payload) => {
            tracing::warn!(
                command = %id,
                "State callback panicked: {}",
                panic_message(&*payload)
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
