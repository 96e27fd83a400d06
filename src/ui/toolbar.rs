//! Toolbar construction from registry contents or a saved layout

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::command::{Bitmap, Command, CommandRegistry, ExecutionResult, IconSize};
use crate::reactive::ReactiveObserver;

use super::activation::Activation;
use super::icons::{resolve_icon, IconProvider};
use super::layout::{ToolbarConfig, ToolbarItem, DEFAULT_TOOLBAR_CATEGORIES, MAIN_TOOLBAR};

/// A toolbar button bound to one command
#[derive(Debug, Clone)]
pub struct ToolItem {
    pub label: String,
    pub tooltip: String,
    pub icon: Bitmap,
    pub enabled: bool,
    pub checkable: bool,
    pub checked: bool,
    activation: Activation,
}

impl ToolItem {
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
}

#[derive(Debug, Clone)]
pub enum ToolbarEntry {
    Tool(ToolItem),
    Separator,
}

/// A flat, ordered strip of tools
#[derive(Debug, Clone)]
pub struct Toolbar {
    pub name: String,
    pub icon_size: IconSize,
    pub visible: bool,
    pub entries: Vec<ToolbarEntry>,
}

impl Toolbar {
    pub fn tools(&self) -> impl Iterator<Item = &ToolItem> {
        self.entries.iter().filter_map(|entry| match entry {
            ToolbarEntry::Tool(tool) => Some(tool),
            ToolbarEntry::Separator => None,
        })
    }

    pub fn tool_count(&self) -> usize {
        self.tools().count()
    }

    pub fn separator_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, ToolbarEntry::Separator))
            .count()
    }

    pub fn find(&self, command_id: &str) -> Option<&ToolItem> {
        self.tools().find(|tool| tool.command_id() == command_id)
    }

    /// Recompute enabled/checked state of every tool
    pub fn refresh(&mut self, registry: &CommandRegistry) {
        for entry in &mut self.entries {
            if let ToolbarEntry::Tool(tool) = entry {
                let id = tool.activation.command_id();
                tool.enabled = registry.can_execute(id);
                tool.checked = tool.checkable && registry.is_checked(id);
            }
        }
    }
}

/// Builds toolbars from the commands in a registry
#[derive(Clone)]
pub struct ToolbarBuilder {
    registry: Rc<CommandRegistry>,
    icons: Option<Rc<dyn IconProvider>>,
    icon_size: IconSize,
    category_order: Vec<String>,
}

impl ToolbarBuilder {
    pub fn new(registry: &Rc<CommandRegistry>) -> Self {
        Self {
            registry: Rc::clone(registry),
            icons: None,
            icon_size: IconSize::default(),
            category_order: DEFAULT_TOOLBAR_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    pub fn with_icon_provider(mut self, provider: Rc<dyn IconProvider>) -> Self {
        self.icons = Some(provider);
        self
    }

    /// Icon size for [`build_toolbar`](Self::build_toolbar); layouts carry their own
    pub fn icon_size(mut self, size: IconSize) -> Self {
        self.icon_size = size;
        self
    }

    /// Category order for the default grouping (default: file, edit, format)
    pub fn category_order<S: Into<String>>(mut self, order: impl IntoIterator<Item = S>) -> Self {
        self.category_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Default toolbar: `show_in_toolbar` commands grouped by category, with a
    /// separator between non-empty groups
    pub fn build_toolbar(&self) -> Toolbar {
        let order: Vec<&str> = self.category_order.iter().map(String::as_str).collect();
        let mut config = ToolbarConfig::from_registry(&self.registry, MAIN_TOOLBAR, &order);
        config.icon_size = self.icon_size;
        self.build_from_config(&config)
    }

    /// Toolbar from an explicit layout
    ///
    /// Listed commands appear regardless of `show_in_toolbar`. Unknown ids
    /// are skipped with a warning; separators left leading, trailing or
    /// doubled by a skip are dropped.
    pub fn build_from_config(&self, config: &ToolbarConfig) -> Toolbar {
        let mut entries: Vec<ToolbarEntry> = Vec::with_capacity(config.items.len());

        for item in &config.items {
            match item {
                ToolbarItem::Separator => {
                    if matches!(entries.last(), Some(ToolbarEntry::Tool(_))) {
                        entries.push(ToolbarEntry::Separator);
                    }
                }
                ToolbarItem::Command { command_id } => match self.registry.get_command(command_id) {
                    Some(cmd) => entries.push(ToolbarEntry::Tool(self.create_tool(&cmd, config.icon_size))),
                    None => tracing::warn!(
                        command = %command_id,
                        "Toolbar '{}' references unknown command, skipping",
                        config.name
                    ),
                },
            }
        }
        if matches!(entries.last(), Some(ToolbarEntry::Separator)) {
            entries.pop();
        }

        let toolbar = Toolbar {
            name: config.name.clone(),
            icon_size: config.icon_size,
            visible: config.visible,
            entries,
        };
        tracing::debug!(
            "Toolbar '{}' created with {} tools",
            toolbar.name,
            toolbar.tool_count()
        );
        toolbar
    }

    /// Every toolbar of a layout, in layout order
    pub fn build_all(&self, layout: &super::layout::ToolbarLayout) -> Vec<Toolbar> {
        layout
            .toolbars
            .iter()
            .map(|config| self.build_from_config(config))
            .collect()
    }

    fn create_tool(&self, cmd: &Command, size: IconSize) -> ToolItem {
        let checkable = cmd.is_checkable();
        ToolItem {
            label: cmd.label.clone(),
            tooltip: cmd.tooltip_or_label().to_string(),
            icon: resolve_icon(cmd, size, self.icons.as_deref()),
            enabled: self.registry.can_execute(&cmd.id),
            checkable,
            checked: checkable && self.registry.is_checked(&cmd.id),
            activation: Activation::new(cmd.id.clone(), &self.registry),
        }
    }
}

/// A toolbar that rebuilds itself when the global icon size changes
///
/// Wrap in [`Managed`](crate::reactive::Managed) to receive broadcasts.
pub struct LiveToolbar {
    builder: ToolbarBuilder,
    config: RefCell<ToolbarConfig>,
    toolbar: RefCell<Toolbar>,
}

impl LiveToolbar {
    pub fn new(builder: ToolbarBuilder, config: ToolbarConfig) -> Self {
        let toolbar = builder.build_from_config(&config);
        Self {
            builder,
            config: RefCell::new(config),
            toolbar: RefCell::new(toolbar),
        }
    }

    pub fn toolbar(&self) -> Ref<'_, Toolbar> {
        self.toolbar.borrow()
    }

    pub fn config(&self) -> Ref<'_, ToolbarConfig> {
        self.config.borrow()
    }

    /// Rebuild after registry or layout changes
    pub fn rebuild(&self) {
        let toolbar = self.builder.build_from_config(&self.config.borrow());
        *self.toolbar.borrow_mut() = toolbar;
    }

    pub fn refresh(&self) {
        self.toolbar.borrow_mut().refresh(&self.builder.registry);
    }
}

impl ReactiveObserver for LiveToolbar {
    fn on_icon_size_changed(&self, size: IconSize) {
        if self.config.borrow().icon_size == size {
            return;
        }
        self.config.borrow_mut().set_icon_size(size);
        self.rebuild();
    }
}
