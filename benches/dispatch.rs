//! Benchmarks for command dispatch hot paths
//!
//! Run with: cargo bench dispatch

use std::rc::Rc;

use divan::Bencher;
use switchboard::catalog;
use switchboard::command::{Command, CommandRegistry};
use switchboard::keymap::{dispatch_shortcut, KeyboardShortcut, ShortcutManager};
use switchboard::palette;
use switchboard::ui::{MenuBuilder, ToolbarBuilder};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn builtin_registry() -> Rc<CommandRegistry> {
    let registry = Rc::new(CommandRegistry::new());
    catalog::register_builtin(&registry).expect("builtin commands register");
    registry
}

/// Built-in catalog padded with `extra` plugin commands
fn large_registry(extra: usize) -> Rc<CommandRegistry> {
    let registry = builtin_registry();
    for i in 0..extra {
        let cmd = Command::new(format!("plugin.action_{}", i), || Ok(()))
            .from_plugin("org.example.bench", 1);
        registry.register_command(cmd).expect("plugin command registers");
    }
    registry
}

// ============================================================================
// Registry
// ============================================================================

#[divan::bench(args = [0, 100, 1000])]
fn execute_command(bencher: Bencher, extra: usize) {
    let registry = large_registry(extra);
    bencher.bench_local(|| divan::black_box(registry.execute_command("edit.copy")));
}

#[divan::bench(args = [0, 100, 1000])]
fn execute_unknown_command(bencher: Bencher, extra: usize) {
    let registry = large_registry(extra);
    bencher.bench_local(|| divan::black_box(registry.execute_command("edit.missing")));
}

#[divan::bench(args = [0, 100, 1000])]
fn commands_by_category(bencher: Bencher, extra: usize) {
    let registry = large_registry(extra);
    bencher.bench_local(|| divan::black_box(registry.commands_by_category("edit")));
}

// ============================================================================
// Shortcuts
// ============================================================================

#[divan::bench]
fn shortcut_lookup(bencher: Bencher) {
    let manager = ShortcutManager::with_defaults(catalog::default_shortcuts());
    let chord = KeyboardShortcut::ctrl('s');
    bencher.bench_local(|| divan::black_box(manager.command_for_shortcut(&chord)));
}

#[divan::bench]
fn shortcut_dispatch(bencher: Bencher) {
    let registry = builtin_registry();
    let manager = ShortcutManager::with_defaults(catalog::default_shortcuts());
    let chord = KeyboardShortcut::ctrl('c');
    bencher.bench_local(|| divan::black_box(dispatch_shortcut(&manager, &registry, chord)));
}

#[divan::bench]
fn shortcut_parse() {
    for text in ["Ctrl+S", "Ctrl+Shift+Z", "Alt+F4", "F11", "Ctrl+Space"] {
        divan::black_box(text.parse::<KeyboardShortcut>().ok());
    }
}

// ============================================================================
// Builders
// ============================================================================

#[divan::bench]
fn build_menu_bar(bencher: Bencher) {
    let registry = builtin_registry();
    bencher.bench_local(|| divan::black_box(MenuBuilder::new(&registry).build_default_menu_bar()));
}

#[divan::bench]
fn build_toolbar(bencher: Bencher) {
    let registry = builtin_registry();
    bencher.bench_local(|| divan::black_box(ToolbarBuilder::new(&registry).build_toolbar()));
}

// ============================================================================
// Palette
// ============================================================================

#[divan::bench(args = ["s", "save", "zoom in", "xyz"])]
fn palette_search(bencher: Bencher, query: &str) {
    let registry = large_registry(500);
    bencher.bench_local(|| divan::black_box(palette::search(&registry, query)));
}
