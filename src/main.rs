mod cli;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use switchboard::catalog;
use switchboard::command::CommandRegistry;
use switchboard::config_paths;
use switchboard::keymap::{self, parse_shortcuts_json};
use switchboard::palette;
use switchboard::ui::{
    register_toolbar_toggles, DirectoryIconProvider, IconProvider, Menu, MenuBuilder, MenuEntry,
    ToolbarBuilder, ToolbarEntry, ToolbarLayout,
};

use cli::{CliArgs, CliCommand};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.verbose {
        switchboard::tracing::init_console("debug");
    } else {
        switchboard::tracing::init();
    }

    let registry = CommandRegistry::global();
    catalog::register_builtin(&registry).context("Failed to register built-in commands")?;

    match args.command {
        CliCommand::Shortcuts { file } => list_shortcuts(file.as_deref()),
        CliCommand::CheckShortcuts { path } => check_shortcuts(&registry, &path),
        CliCommand::Menus => print_menus(&registry),
        CliCommand::Toolbar { layout } => print_toolbars(&registry, layout.as_deref()),
        CliCommand::Search { query } => search(&registry, &query),
    }
}

fn list_shortcuts(file: Option<&Path>) -> Result<()> {
    let user_file = file
        .map(Path::to_path_buf)
        .or_else(config_paths::shortcuts_file);
    let (manager, report) =
        keymap::load_with_overrides(catalog::default_shortcuts(), user_file.as_deref());

    let overridden: Vec<_> = manager.overrides().map(|(s, _)| *s).collect();
    for (shortcut, command) in manager.bindings() {
        let marker = if overridden.contains(shortcut) { "*" } else { " " };
        println!("{} {:<20} {}", marker, shortcut.to_string(), command);
    }

    if let Some(report) = report {
        if !report.is_clean() {
            eprintln!(
                "{} entries skipped (run check-shortcuts for details)",
                report.skipped.len()
            );
        }
    }
    Ok(())
}

fn check_shortcuts(registry: &CommandRegistry, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (bindings, skipped) = parse_shortcuts_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    println!(
        "{}: {} valid, {} skipped",
        path.display(),
        bindings.len(),
        skipped.len()
    );
    for entry in &skipped {
        println!("  entry {}: {}", entry.index, entry.reason);
    }
    for (shortcut, command) in &bindings {
        if !registry.contains(command) {
            println!("  note: {} -> {} (command not registered)", shortcut, command);
        }
    }

    if skipped.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} invalid entries in {}", skipped.len(), path.display())
    }
}

fn print_menus(registry: &Rc<CommandRegistry>) -> Result<()> {
    let layout = Rc::new(RefCell::new(load_layout(registry, None)));
    register_toolbar_toggles(registry, &layout).context("Failed to register toolbar toggles")?;

    let manager = keymap::load_user_shortcuts(catalog::default_shortcuts());
    let bar = MenuBuilder::new(registry)
        .with_shortcut_hints(&manager)
        .build_default_menu_bar();

    for menu in &bar.menus {
        print_menu(menu, 0);
    }
    Ok(())
}

fn print_menu(menu: &Menu, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}", indent, menu.plain_title());
    for entry in &menu.entries {
        match entry {
            MenuEntry::Action(item) => {
                let check = match (item.checkable, item.checked) {
                    (true, true) => "[x] ",
                    (true, false) => "[ ] ",
                    _ => "",
                };
                let label = item.display_label().replace('\t', "    ");
                let disabled = if item.enabled { "" } else { " (disabled)" };
                println!("{}  {}{}{}", indent, check, label, disabled);
            }
            MenuEntry::Separator => println!("{}  ----", indent),
            MenuEntry::Submenu(submenu) => print_menu(submenu, depth + 1),
        }
    }
}

fn load_layout(registry: &CommandRegistry, layout_file: Option<&Path>) -> ToolbarLayout {
    match layout_file
        .map(Path::to_path_buf)
        .or_else(config_paths::toolbars_file)
    {
        Some(path) => ToolbarLayout::load_or_default(&path, registry),
        None => ToolbarLayout::default_for(registry),
    }
}

fn print_toolbars(registry: &Rc<CommandRegistry>, layout_file: Option<&Path>) -> Result<()> {
    let layout = load_layout(registry, layout_file);

    let mut builder = ToolbarBuilder::new(registry);
    if let Some(dir) = config_paths::icons_dir().filter(|d| d.is_dir()) {
        let provider: Rc<dyn IconProvider> = Rc::new(DirectoryIconProvider::new(dir));
        builder = builder.with_icon_provider(provider);
    }

    for toolbar in builder.build_all(&layout) {
        let visibility = if toolbar.visible { "visible" } else { "hidden" };
        println!("{} ({}, {})", toolbar.name, toolbar.icon_size, visibility);
        let line: Vec<String> = toolbar
            .entries
            .iter()
            .map(|entry| match entry {
                ToolbarEntry::Tool(tool) => format!("[{}]", tool.label),
                ToolbarEntry::Separator => "|".to_string(),
            })
            .collect();
        println!("  {}", line.join(" "));
    }
    Ok(())
}

fn search(registry: &CommandRegistry, query: &str) -> Result<()> {
    let matches = palette::search(registry, query);
    if matches.is_empty() {
        println!("No commands match '{}'", query);
        return Ok(());
    }
    for m in matches {
        let shortcut = m.shortcut.map(|s| s.to_string()).unwrap_or_default();
        let disabled = if m.enabled { "" } else { " (disabled)" };
        println!(
            "{:>5}  {:<22} {:<18} {}{}",
            m.score, m.command_id, m.label, shortcut, disabled
        );
    }
    Ok(())
}
