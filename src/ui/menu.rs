//! Menu construction from registry contents
//!
//! The builder decides *which* commands appear; structure beyond that
//! (separators, submenus) is added explicitly by the assembling code via
//! [`Menu::add_separator`] and [`Menu::add_submenu`].

use std::collections::HashMap;
use std::rc::Rc;

use crate::command::{Bitmap, Command, CommandRegistry, ExecutionResult, IconSize};
use crate::keymap::{KeyboardShortcut, ShortcutManager};

use super::activation::Activation;
use super::icons::{find_icon, IconProvider};

/// Default top-level menus: `(category, title)`; `&` marks the mnemonic
pub const DEFAULT_MENU_STRUCTURE: &[(&str, &str)] = &[
    ("file", "&File"),
    ("edit", "&Edit"),
    ("format", "F&ormat"),
    ("view", "&View"),
    ("help", "&Help"),
];

/// A clickable menu entry bound to one command
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub tooltip: String,
    pub shortcut: Option<KeyboardShortcut>,
    pub icon: Option<Bitmap>,
    pub enabled: bool,
    pub checkable: bool,
    pub checked: bool,
    activation: Activation,
}

impl MenuItem {
    /// Label with the shortcut hint, `"Save\tCtrl+S"`
    pub fn display_label(&self) -> String {
        match self.shortcut {
            Some(shortcut) => format!("{}\t{}", self.label, shortcut),
            None => self.label.clone(),
        }
    }

    pub fn command_id(&self) -> &str {
        self.activation.command_id()
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// Simulate a click
    pub fn trigger(&self) -> ExecutionResult {
        self.activation.trigger()
    }

    fn refresh(&mut self, registry: &CommandRegistry) {
        let id = self.activation.command_id();
        self.enabled = registry.can_execute(id);
        self.checked = self.checkable && registry.is_checked(id);
    }
}

/// One row of a menu
#[derive(Debug, Clone)]
pub enum MenuEntry {
    Action(MenuItem),
    Separator,
    Submenu(Menu),
}

/// A menu (top-level or nested)
#[derive(Debug, Clone, Default)]
pub struct Menu {
    /// Title as given, possibly with an `&` mnemonic marker
    pub title: String,
    /// Registry category the menu was built from (empty for hand-built menus)
    pub category: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Title without mnemonic markers (`"F&ormat"` -> `"Format"`, `"&&"` -> `"&"`)
    pub fn plain_title(&self) -> String {
        let mut out = String::with_capacity(self.title.len());
        let mut chars = self.title.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '&' {
                if chars.peek() == Some(&'&') {
                    out.push('&');
                    chars.next();
                }
                continue;
            }
            out.push(c);
        }
        out
    }

    pub fn add_separator(&mut self) {
        self.entries.push(MenuEntry::Separator);
    }

    pub fn add_submenu(&mut self, submenu: Menu) {
        tracing::debug!("Added submenu '{}' to '{}'", submenu.title, self.title);
        self.entries.push(MenuEntry::Submenu(submenu));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct action entries (not descending into submenus)
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Action(item) => Some(item),
            _ => None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Find an item by command id, searching submenus
    pub fn find(&self, command_id: &str) -> Option<&MenuItem> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Action(item) if item.command_id() == command_id => Some(item),
            MenuEntry::Submenu(menu) => menu.find(command_id),
            _ => None,
        })
    }

    /// Recompute enabled/checked state of every item, including submenus
    ///
    /// Call from the application's state-change hook; menus never poll.
    pub fn refresh(&mut self, registry: &CommandRegistry) {
        for entry in &mut self.entries {
            match entry {
                MenuEntry::Action(item) => item.refresh(registry),
                MenuEntry::Submenu(menu) => menu.refresh(registry),
                MenuEntry::Separator => {}
            }
        }
    }
}

/// Ordered top-level menus
#[derive(Debug, Clone, Default)]
pub struct MenuBar {
    pub menus: Vec<Menu>,
}

impl MenuBar {
    pub fn menu(&self, category: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.category == category)
    }

    pub fn menu_mut(&mut self, category: &str) -> Option<&mut Menu> {
        self.menus.iter_mut().find(|m| m.category == category)
    }

    pub fn find(&self, command_id: &str) -> Option<&MenuItem> {
        self.menus.iter().find_map(|m| m.find(command_id))
    }

    pub fn refresh(&mut self, registry: &CommandRegistry) {
        for menu in &mut self.menus {
            menu.refresh(registry);
        }
    }
}

/// Builds menus from the commands in a registry
pub struct MenuBuilder {
    registry: Rc<CommandRegistry>,
    icons: Option<Rc<dyn IconProvider>>,
    shortcut_hints: Option<HashMap<String, KeyboardShortcut>>,
}

impl MenuBuilder {
    pub fn new(registry: &Rc<CommandRegistry>) -> Self {
        Self {
            registry: Rc::clone(registry),
            icons: None,
            shortcut_hints: None,
        }
    }

    /// Look up icons missing from a command's own icon set
    pub fn with_icon_provider(mut self, provider: Rc<dyn IconProvider>) -> Self {
        self.icons = Some(provider);
        self
    }

    /// Take shortcut hints from the live bindings instead of each command's
    /// declared `shortcut`
    ///
    /// When a command has several chords the first in chord order is shown.
    pub fn with_shortcut_hints(mut self, manager: &ShortcutManager) -> Self {
        let mut hints = HashMap::new();
        for (shortcut, command_id) in manager.bindings() {
            hints.entry(command_id.to_string()).or_insert(*shortcut);
        }
        self.shortcut_hints = Some(hints);
        self
    }

    /// Build one menu from a category
    ///
    /// Without `explicit_order`, entries follow registration order. With it,
    /// only the listed ids appear, in the listed order; ids that are unknown
    /// or belong to another category are skipped. Commands with
    /// `show_in_menu == false` never appear.
    pub fn build_menu(&self, category: &str, title: &str, explicit_order: Option<&[&str]>) -> Menu {
        let commands = self.registry.commands_by_category(category);

        let ordered: Vec<&Command> = match explicit_order {
            Some(order) => order
                .iter()
                .filter_map(|id| {
                    let found = commands.iter().find(|cmd| cmd.id == *id);
                    if found.is_none() {
                        tracing::debug!(command = %id, "Menu '{}' skips missing command", category);
                    }
                    found
                })
                .collect(),
            None => commands.iter().collect(),
        };

        let mut menu = Menu {
            title: title.to_string(),
            category: category.to_string(),
            entries: Vec::with_capacity(ordered.len()),
        };
        for cmd in ordered {
            if !cmd.show_in_menu {
                tracing::trace!(command = %cmd.id, "Skipping command (show_in_menu=false)");
                continue;
            }
            menu.entries.push(MenuEntry::Action(self.create_item(cmd)));
        }

        tracing::debug!(
            "Built menu '{}' with {} items",
            category,
            menu.entries.len()
        );
        menu
    }

    /// Build several top-level menus in the given `(category, title)` order
    ///
    /// Empty categories still produce an (empty) menu.
    pub fn build_menu_bar(&self, structure: &[(&str, &str)]) -> MenuBar {
        let menus: Vec<Menu> = structure
            .iter()
            .map(|(category, title)| self.build_menu(category, title, None))
            .collect();
        tracing::info!("Menu bar created with {} menus", menus.len());
        MenuBar { menus }
    }

    /// [`build_menu_bar`](Self::build_menu_bar) with [`DEFAULT_MENU_STRUCTURE`]
    pub fn build_default_menu_bar(&self) -> MenuBar {
        self.build_menu_bar(DEFAULT_MENU_STRUCTURE)
    }

    fn create_item(&self, cmd: &Command) -> MenuItem {
        let shortcut = match &self.shortcut_hints {
            Some(hints) => hints.get(&cmd.id).copied(),
            None => cmd.shortcut,
        };
        let checkable = cmd.is_checkable();

        MenuItem {
            label: cmd.label.clone(),
            tooltip: cmd.tooltip.clone(),
            shortcut,
            icon: find_icon(cmd, IconSize::Small, self.icons.as_deref()),
            enabled: self.registry.can_execute(&cmd.id),
            checkable,
            checked: checkable && self.registry.is_checked(&cmd.id),
            activation: Activation::new(cmd.id.clone(), &self.registry),
        }
    }
}
