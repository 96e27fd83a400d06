//! Persisted toolbar layout (`toolbars.json`)
//!
//! ```json
//! {"toolbars": [{"name": "main", "iconSize": 24, "visible": true,
//!   "items": [{"type": "command", "commandId": "file.save"}, {"type": "separator"}]}]}
//! ```
//!
//! Created from the registry on first run, customised by the user, saved,
//! and reloaded at the next start. When a layout exists its explicit item
//! list replaces the default category grouping.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandRegistry, IconSize, RegistrationError};

/// Category order for the generated default toolbar
pub const DEFAULT_TOOLBAR_CATEGORIES: &[&str] = &["file", "edit", "format"];

/// Name of the toolbar generated from the registry
pub const MAIN_TOOLBAR: &str = "main";

/// Category of the per-toolbar show/hide commands
pub const TOOLBAR_TOGGLE_CATEGORY: &str = "view";

/// Errors reading or writing a layout file
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toolbar layout: {0}")]
    Json(#[from] serde_json::Error),
}

/// One slot in a toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolbarItem {
    Command {
        #[serde(rename = "commandId")]
        command_id: String,
    },
    Separator,
}

impl ToolbarItem {
    pub fn command(id: impl Into<String>) -> Self {
        ToolbarItem::Command {
            command_id: id.into(),
        }
    }

    pub fn command_id(&self) -> Option<&str> {
        match self {
            ToolbarItem::Command { command_id } => Some(command_id),
            ToolbarItem::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, ToolbarItem::Separator)
    }
}

fn default_visible() -> bool {
    true
}

/// Layout of a single toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarConfig {
    pub name: String,
    #[serde(default)]
    pub icon_size: IconSize,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub items: Vec<ToolbarItem>,
}

impl ToolbarConfig {
    /// Empty, visible toolbar at the default icon size
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_size: IconSize::default(),
            visible: true,
            items: Vec::new(),
        }
    }

    /// Default grouping: `show_in_toolbar` commands of each category in
    /// `category_order`, in registration order, with a separator between
    /// non-empty groups
    pub fn from_registry(
        registry: &CommandRegistry,
        name: impl Into<String>,
        category_order: &[&str],
    ) -> Self {
        let mut config = Self::new(name);
        for category in category_order {
            let group: Vec<_> = registry
                .commands_by_category(category)
                .into_iter()
                .filter(|cmd| cmd.show_in_toolbar)
                .collect();
            if group.is_empty() {
                continue;
            }
            if !config.items.is_empty() {
                config.push_separator();
            }
            for cmd in group {
                config.push_command(cmd.id);
            }
        }
        config
    }

    pub fn push_command(&mut self, command_id: impl Into<String>) {
        self.items.push(ToolbarItem::command(command_id));
    }

    pub fn push_separator(&mut self) {
        self.items.push(ToolbarItem::Separator);
    }

    /// Remove the item at `index`
    pub fn remove_item(&mut self, index: usize) -> Option<ToolbarItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove every occurrence of a command, returning how many were removed
    pub fn remove_command(&mut self, command_id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.command_id() != Some(command_id));
        before - self.items.len()
    }

    /// Move an item from one position to another
    ///
    /// Returns false if either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_icon_size(&mut self, size: IconSize) {
        self.icon_size = size;
    }

    /// Command ids in item order
    pub fn command_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(ToolbarItem::command_id)
    }
}

/// All toolbars of the application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarLayout {
    #[serde(default)]
    pub toolbars: Vec<ToolbarConfig>,
}

impl ToolbarLayout {
    /// Single main toolbar generated from the registry
    pub fn default_for(registry: &CommandRegistry) -> Self {
        Self {
            toolbars: vec![ToolbarConfig::from_registry(
                registry,
                MAIN_TOOLBAR,
                DEFAULT_TOOLBAR_CATEGORIES,
            )],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} toolbars from {}",
            layout.toolbars.len(),
            path.display()
        );
        Ok(layout)
    }

    /// Write the layout, creating the parent directory if needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let write_err = |source| LayoutError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, json).map_err(write_err)?;
        tracing::info!("Saved toolbar layout to {}", path.display());
        Ok(())
    }

    /// Load the saved layout, falling back to the registry default when the
    /// file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>, registry: &CommandRegistry) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(
                "Toolbar layout not found at {}, using defaults",
                path.display()
            );
            return Self::default_for(registry);
        }
        match Self::load(path) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("{}, using default toolbar", e);
                Self::default_for(registry)
            }
        }
    }

    pub fn toolbar(&self, name: &str) -> Option<&ToolbarConfig> {
        self.toolbars.iter().find(|t| t.name == name)
    }

    pub fn toolbar_mut(&mut self, name: &str) -> Option<&mut ToolbarConfig> {
        self.toolbars.iter_mut().find(|t| t.name == name)
    }

    /// Show or hide a toolbar by name; false if no such toolbar
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.toolbar_mut(name) {
            Some(toolbar) => {
                toolbar.set_visible(visible);
                true
            }
            None => false,
        }
    }
}

/// Id of the command that shows or hides the toolbar `name`
pub fn toolbar_toggle_id(name: &str) -> String {
    format!("{}.toolbar.{}", TOOLBAR_TOGGLE_CATEGORY, name)
}

fn toolbar_toggle_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} Toolbar", first.to_uppercase(), chars.as_str()),
        None => "Toolbar".to_string(),
    }
}

/// Register one checkable `view.toolbar.<name>` command per toolbar
///
/// Each command reports the toolbar's `visible` flag as its checked state
/// and flips it when executed. Toolbars added to the layout later need
/// another call. Returns the number of commands registered.
pub fn register_toolbar_toggles(
    registry: &CommandRegistry,
    layout: &Rc<RefCell<ToolbarLayout>>,
) -> Result<usize, RegistrationError> {
    let names: Vec<String> = layout
        .borrow()
        .toolbars
        .iter()
        .map(|t| t.name.clone())
        .collect();

    for name in &names {
        let target = Rc::clone(layout);
        let toolbar = name.clone();
        let execute = move || -> anyhow::Result<()> {
            let mut layout = target
                .try_borrow_mut()
                .map_err(|_| anyhow::anyhow!("toolbar layout is already borrowed"))?;
            let config = layout
                .toolbar_mut(&toolbar)
                .ok_or_else(|| anyhow::anyhow!("no toolbar named '{}'", toolbar))?;
            config.set_visible(!config.visible);
            tracing::debug!(toolbar = %toolbar, visible = config.visible, "Toggled toolbar");
            Ok(())
        };

        let source = Rc::clone(layout);
        let watched = name.clone();
        let checked = move || {
            source
                .try_borrow()
                .ok()
                .and_then(|layout| layout.toolbar(&watched).map(|t| t.visible))
                .unwrap_or(false)
        };

        let label = toolbar_toggle_label(name);
        registry.register_command(
            Command::new(toolbar_toggle_id(name), execute)
                .tooltip(format!("Show or hide the {}", label.to_lowercase()))
                .label(label)
                .category(TOOLBAR_TOGGLE_CATEGORY)
                .checked_when(checked),
        )?;
    }

    tracing::debug!("Registered {} toolbar toggles", names.len());
    Ok(names.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(id: &str) -> Command {
        Command::new(id, || Ok(())).show_in_toolbar(true)
    }

    #[test]
    fn test_item_json_shape() {
        let json = serde_json::to_string(&ToolbarItem::command("file.save")).unwrap();
        assert_eq!(json, r#"{"type":"command","commandId":"file.save"}"#);
        let json = serde_json::to_string(&ToolbarItem::Separator).unwrap();
        assert_eq!(json, r#"{"type":"separator"}"#);
    }

    #[test]
    fn test_parse_layout_file() {
        let json = r#"{"toolbars": [{"name": "main", "iconSize": 32, "visible": false,
            "items": [{"type": "command", "commandId": "file.save"}, {"type": "separator"}]}]}"#;
        let layout = ToolbarLayout::from_json(json).unwrap();
        let main = layout.toolbar("main").unwrap();

        assert_eq!(main.icon_size, IconSize::Large);
        assert!(!main.visible);
        assert_eq!(
            main.items,
            [ToolbarItem::command("file.save"), ToolbarItem::Separator]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let layout = ToolbarLayout::from_json(r#"{"toolbars": [{"name": "extra"}]}"#).unwrap();
        let extra = &layout.toolbars[0];
        assert!(extra.visible);
        assert_eq!(extra.icon_size, IconSize::Medium);
        assert!(extra.items.is_empty());
    }

    #[test]
    fn test_from_registry_groups_categories() {
        let registry = CommandRegistry::new();
        registry.register_command(tool("edit.undo")).unwrap();
        registry.register_command(tool("file.new")).unwrap();
        registry
            .register_command(Command::new("file.close", || Ok(())))
            .unwrap();
        registry.register_command(tool("file.save")).unwrap();
        registry.register_command(tool("view.zoom")).unwrap();

        let config = ToolbarConfig::from_registry(&registry, "main", DEFAULT_TOOLBAR_CATEGORIES);
        assert_eq!(
            config.items,
            [
                ToolbarItem::command("file.new"),
                ToolbarItem::command("file.save"),
                ToolbarItem::Separator,
                ToolbarItem::command("edit.undo"),
            ]
        );
    }

    #[test]
    fn test_no_separator_for_empty_groups() {
        let registry = CommandRegistry::new();
        registry.register_command(tool("format.bold")).unwrap();

        let config = ToolbarConfig::from_registry(&registry, "main", DEFAULT_TOOLBAR_CATEGORIES);
        assert_eq!(config.items, [ToolbarItem::command("format.bold")]);
        assert!(!config.items.iter().any(ToolbarItem::is_separator));
    }

    #[test]
    fn test_customisation_ops() {
        let mut config = ToolbarConfig::new("main");
        config.push_command("file.new");
        config.push_command("file.open");
        config.push_separator();
        config.push_command("edit.undo");

        assert!(config.move_item(3, 0));
        assert_eq!(config.command_ids().collect::<Vec<_>>(), ["edit.undo", "file.new", "file.open"]);
        assert!(!config.move_item(0, 9));

        assert_eq!(config.remove_item(3), Some(ToolbarItem::Separator));
        assert_eq!(config.remove_item(3), None);
        assert_eq!(config.remove_command("file.new"), 1);

        config.set_icon_size(IconSize::Small);
        config.set_visible(false);
        assert_eq!(config.icon_size, IconSize::Small);
        assert!(!config.visible);
    }

    #[test]
    fn test_load_or_default_on_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolbars.json");
        std::fs::write(&path, "{ nope").unwrap();

        let registry = CommandRegistry::new();
        registry.register_command(tool("file.new")).unwrap();

        let layout = ToolbarLayout::load_or_default(&path, &registry);
        assert_eq!(layout.toolbars.len(), 1);
        assert_eq!(layout.toolbars[0].name, MAIN_TOOLBAR);
    }

    #[test]
    fn test_toggle_label_and_id() {
        assert_eq!(toolbar_toggle_id("main"), "view.toolbar.main");
        assert_eq!(toolbar_toggle_label("main"), "Main Toolbar");
        assert_eq!(toolbar_toggle_label("édition"), "Édition Toolbar");
    }

    #[test]
    fn test_toggle_flips_visibility() {
        let registry = CommandRegistry::new();
        let mut config = ToolbarConfig::new("format");
        config.push_command("format.bold");
        let layout = Rc::new(RefCell::new(ToolbarLayout {
            toolbars: vec![ToolbarConfig::new(MAIN_TOOLBAR), config],
        }));

        assert_eq!(register_toolbar_toggles(&registry, &layout).unwrap(), 2);
        assert!(registry.is_checked("view.toolbar.format"));

        assert!(registry.execute_command("view.toolbar.format").is_success());
        assert!(!layout.borrow().toolbar("format").unwrap().visible);
        assert!(!registry.is_checked("view.toolbar.format"));
        assert!(registry.is_checked("view.toolbar.main"));

        assert!(registry.execute_command("view.toolbar.format").is_success());
        assert!(layout.borrow().toolbar("format").unwrap().visible);
    }

    #[test]
    fn test_toggle_for_removed_toolbar_fails() {
        let registry = CommandRegistry::new();
        let layout = Rc::new(RefCell::new(ToolbarLayout {
            toolbars: vec![ToolbarConfig::new("extra")],
        }));
        register_toolbar_toggles(&registry, &layout).unwrap();
        layout.borrow_mut().toolbars.clear();

        assert!(!registry.execute_command("view.toolbar.extra").is_success());
        assert!(!registry.is_checked("view.toolbar.extra"));
    }
}
