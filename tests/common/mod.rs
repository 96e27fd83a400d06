//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use switchboard::command::{Command, CommandRegistry};

/// Fresh, non-global registry shared the way the UI shares it
pub fn test_registry() -> Rc<CommandRegistry> {
    Rc::new(CommandRegistry::new())
}

/// Command whose callback does nothing
pub fn noop(id: &str) -> Command {
    Command::new(id, || Ok(()))
}

/// Command visible in the toolbar
pub fn tool(id: &str) -> Command {
    noop(id).show_in_toolbar(true)
}

/// Command that counts its executions
pub fn counting(id: &str) -> (Command, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let command = Command::new(id, move || {
        counter.set(counter.get() + 1);
        Ok(())
    });
    (command, count)
}

/// Register every command, panicking on rejection
pub fn register_all(registry: &CommandRegistry, commands: impl IntoIterator<Item = Command>) {
    for command in commands {
        registry.register_command(command).unwrap();
    }
}
