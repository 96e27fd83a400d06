//! Centralized configuration paths for switchboard
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/switchboard/`
//! - Windows: `%APPDATA%\switchboard\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "switchboard";

/// Base config directory for switchboard
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/switchboard`
///   - Else: `~/.config/switchboard`
///
/// Windows:
///   - `%APPDATA%\switchboard`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
            .or_else(|| dirs::config_dir().map(|config| config.join(APP_DIR)))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/switchboard/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/switchboard/shortcuts.json`
pub fn shortcuts_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("shortcuts.json"))
}

/// `~/.config/switchboard/toolbars.json`
pub fn toolbars_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("toolbars.json"))
}

/// `~/.config/switchboard/icons/` (one `<command-id>.png` per command)
pub fn icons_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("icons"))
}

/// `~/.config/switchboard/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    ensure_config_dir()?;
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
