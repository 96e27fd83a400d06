//! Configuration tests
//!
//! Tests for config paths, preference persistence and user shortcut overrides.

use switchboard::catalog;
use switchboard::command::IconSize;
use switchboard::config_paths;
use switchboard::keymap::{load_with_overrides, ConflictPolicy, KeyboardShortcut};
use switchboard::AppConfig;

// ========================================================================
// Config paths
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("switchboard"));
    }
}

#[test]
fn test_file_names() {
    if let Some(path) = config_paths::shortcuts_file() {
        assert!(path.ends_with("shortcuts.json"));
    }
    if let Some(path) = config_paths::toolbars_file() {
        assert!(path.ends_with("toolbars.json"));
    }
    if let Some(path) = config_paths::config_file() {
        assert!(path.ends_with("config.yaml"));
    }
    if let Some(path) = config_paths::icons_dir() {
        assert!(path.ends_with("icons"));
    }
}

#[test]
fn test_files_share_config_dir() {
    if let (Some(dir), Some(shortcuts), Some(toolbars)) = (
        config_paths::config_dir(),
        config_paths::shortcuts_file(),
        config_paths::toolbars_file(),
    ) {
        assert_eq!(shortcuts.parent(), Some(dir.as_path()));
        assert_eq!(toolbars.parent(), Some(dir.as_path()));
    }
}

// ========================================================================
// AppConfig
// ========================================================================

#[test]
fn test_app_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("switchboard").join("config.yaml");

    let config = AppConfig {
        theme: "solarized".to_string(),
        locale: "pl".to_string(),
        icon_size: IconSize::Small,
        font_scale: 1.25,
        conflict_policy: ConflictPolicy::Reject,
    };
    config.save_to(&path).unwrap();

    assert_eq!(AppConfig::load_from(&path), config);
}

#[test]
fn test_app_config_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "theme: nord\n").unwrap();

    let config = AppConfig::load_from(&path);
    assert_eq!(config.theme, "nord");
    assert_eq!(config.icon_size, AppConfig::default().icon_size);
}

#[test]
fn test_app_config_invalid_yaml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "theme: [unterminated").unwrap();

    assert_eq!(AppConfig::load_from(&path), AppConfig::default());
}

// ========================================================================
// User shortcut overrides
// ========================================================================

#[test]
fn test_user_file_overrides_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shortcuts.json");
    std::fs::write(
        &path,
        r#"{"shortcuts": [{"key": "Ctrl+S", "command": "file.save_as"}]}"#,
    )
    .unwrap();

    let (manager, report) = load_with_overrides(catalog::default_shortcuts(), Some(&path));

    assert!(report.unwrap().is_clean());
    assert_eq!(
        manager.command_for_shortcut(&KeyboardShortcut::ctrl('s')),
        Some("file.save_as")
    );
    assert_eq!(
        manager.command_for_shortcut(&KeyboardShortcut::ctrl('o')),
        Some("file.open")
    );
}

#[test]
fn test_missing_user_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shortcuts.json");

    let (manager, report) = load_with_overrides(catalog::default_shortcuts(), Some(&path));

    assert!(report.is_none());
    assert_eq!(manager.len(), catalog::default_shortcuts().len());
}
