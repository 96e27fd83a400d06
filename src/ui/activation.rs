//! Activation handle shared by menu entries and toolbar tools

use std::fmt;
use std::rc::{Rc, Weak};

use crate::command::{CommandRegistry, ExecutionResult};

/// What a widget fires when clicked
///
/// Holds the command id by value, never the [`Command`](crate::command::Command)
/// itself, so a command replaced after the widget was built still dispatches
/// to the newest registration. The registry link is weak: a widget never
/// keeps the registry alive.
#[derive(Clone)]
pub struct Activation {
    command_id: String,
    registry: Weak<CommandRegistry>,
}

impl Activation {
    pub fn new(command_id: impl Into<String>, registry: &Rc<CommandRegistry>) -> Self {
        Self {
            command_id: command_id.into(),
            registry: Rc::downgrade(registry),
        }
    }

    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    /// Dispatch through the registry
    ///
    /// Once the registry has been dropped this is a silent
    /// [`ExecutionResult::CommandNotFound`].
    pub fn trigger(&self) -> ExecutionResult {
        match self.registry.upgrade() {
            Some(registry) => registry.execute_command(&self.command_id),
            None => {
                tracing::debug!(command = %self.command_id, "Registry gone, ignoring activation");
                ExecutionResult::CommandNotFound
            }
        }
    }

    /// The registry this activation dispatches to, if still alive
    pub fn registry(&self) -> Option<Rc<CommandRegistry>> {
        self.registry.upgrade()
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("command_id", &self.command_id)
            .field("registry_alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[test]
    fn test_trigger_dispatches_by_id() {
        let registry = Rc::new(CommandRegistry::new());
        registry
            .register_command(Command::new("view.zoom_in", || Ok(())))
            .unwrap();

        let activation = Activation::new("view.zoom_in", &registry);
        assert_eq!(activation.trigger(), ExecutionResult::Success);
        assert_eq!(activation.command_id(), "view.zoom_in");
    }

    #[test]
    fn test_trigger_after_registry_dropped() {
        let registry = Rc::new(CommandRegistry::new());
        registry
            .register_command(Command::new("view.zoom_in", || Ok(())))
            .unwrap();
        let activation = Activation::new("view.zoom_in", &registry);

        drop(registry);
        assert_eq!(activation.trigger(), ExecutionResult::CommandNotFound);
        assert!(activation.registry().is_none());
    }
}
