//! Command descriptor: one user-invokable operation
//!
//! A [`Command`] is data plus three stored callbacks. It carries no behaviour
//! of its own; the registry decides when the callbacks run.

use std::fmt;
use std::rc::Rc;

use super::icon::IconSet;
use crate::keymap::KeyboardShortcut;

/// The side-effecting operation. Returning `Err` (or panicking) marks the
/// execution as failed without unwinding into the UI event loop.
pub type ExecuteFn = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Dynamic state query (enabled / checked)
pub type PredicateFn = Rc<dyn Fn() -> bool>;

/// Complete command descriptor
///
/// ```ignore
/// let save = Command::new("file.save", || document.save())
///     .label("Save")
///     .tooltip("Save current document")
///     .shortcut(KeyboardShortcut::ctrl('s'))
///     .show_in_toolbar(true)
///     .enabled_when(move || document.is_modified());
/// ```
#[derive(Clone)]
pub struct Command {
    /// Unique id, `"<category>.<action>"` by convention
    pub id: String,
    pub label: String,
    pub tooltip: String,
    /// Grouping key for menu and toolbar sections
    pub category: String,

    pub icons: IconSet,
    pub shortcut: Option<KeyboardShortcut>,
    pub show_in_menu: bool,
    pub show_in_toolbar: bool,

    pub execute: ExecuteFn,
    /// Absent means always enabled
    pub is_enabled: Option<PredicateFn>,
    /// Absent means not checkable
    pub is_checked: Option<PredicateFn>,

    pub is_plugin_command: bool,
    pub plugin_id: String,
    pub api_version: u32,
}

impl Command {
    /// Create a command; category and label are derived from the id
    /// (`"file.save_as"` -> category `"file"`, label `"Save as"`)
    pub fn new(id: impl Into<String>, execute: impl Fn() -> anyhow::Result<()> + 'static) -> Self {
        let id = id.into();
        let (category, action) = match id.split_once('.') {
            Some((category, action)) => (category.to_string(), action),
            None => (String::new(), id.as_str()),
        };
        let label = humanize(action);

        Self {
            label,
            tooltip: String::new(),
            category,
            icons: IconSet::default(),
            shortcut: None,
            show_in_menu: true,
            show_in_toolbar: false,
            execute: Rc::new(execute),
            is_enabled: None,
            is_checked: None,
            is_plugin_command: false,
            plugin_id: String::new(),
            api_version: 1,
            id,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn icons(mut self, icons: IconSet) -> Self {
        self.icons = icons;
        self
    }

    pub fn shortcut(mut self, shortcut: KeyboardShortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn show_in_menu(mut self, show: bool) -> Self {
        self.show_in_menu = show;
        self
    }

    pub fn show_in_toolbar(mut self, show: bool) -> Self {
        self.show_in_toolbar = show;
        self
    }

    /// Gate execution on a dynamic condition
    pub fn enabled_when(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.is_enabled = Some(Rc::new(predicate));
        self
    }

    /// Make the command checkable with a dynamic toggle state
    pub fn checked_when(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.is_checked = Some(Rc::new(predicate));
        self
    }

    /// Mark the command as contributed by a plugin
    pub fn from_plugin(mut self, plugin_id: impl Into<String>, api_version: u32) -> Self {
        self.is_plugin_command = true;
        self.plugin_id = plugin_id.into();
        self.api_version = api_version;
        self
    }

    /// True when the command has a toggle state
    pub fn is_checkable(&self) -> bool {
        self.is_checked.is_some()
    }

    /// Tooltip, falling back to the label when none was given
    pub fn tooltip_or_label(&self) -> &str {
        if self.tooltip.is_empty() {
            &self.label
        } else {
            &self.tooltip
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("category", &self.category)
            .field("shortcut", &self.shortcut.map(|s| s.to_string()))
            .field("show_in_menu", &self.show_in_menu)
            .field("show_in_toolbar", &self.show_in_toolbar)
            .field("checkable", &self.is_checkable())
            .field("plugin_id", &self.plugin_id)
            .finish_non_exhaustive()
    }
}

fn humanize(action: &str) -> String {
    let spaced = action.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
