//! Application configuration persistence
//!
//! Stores user preferences in `~/.config/switchboard/config.yaml`. Changing a
//! preference through [`AppConfig::apply`] broadcasts it to live widgets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::IconSize;
use crate::keymap::ConflictPolicy;
use crate::reactive::{Attribute, ReactiveBroadcast};

/// Preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Selected theme id (e.g., "default-dark")
    pub theme: String,
    /// UI language tag (e.g., "en", "pl")
    pub locale: String,
    /// Toolbar icon size in pixels (16, 24, 32 or 48)
    pub icon_size: IconSize,
    pub font_scale: f32,
    /// What happens when a shortcut is bound to a chord that is taken
    pub conflict_policy: ConflictPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: "default-dark".to_string(),
            locale: "en".to_string(),
            icon_size: IconSize::Medium,
            font_scale: 1.0,
            conflict_policy: ConflictPolicy::Replace,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the standard location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a file, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Attribute changes between `self` and `other`
    pub fn changes(&self, other: &AppConfig) -> Vec<Attribute> {
        let mut changes = Vec::new();
        if self.theme != other.theme {
            changes.push(Attribute::Theme(other.theme.clone()));
        }
        if self.icon_size != other.icon_size {
            changes.push(Attribute::IconSize(other.icon_size));
        }
        if self.locale != other.locale {
            changes.push(Attribute::Locale(other.locale.clone()));
        }
        if self.font_scale != other.font_scale {
            changes.push(Attribute::FontScale(other.font_scale));
        }
        changes
    }

    /// Replace the config and broadcast one attribute per changed field
    ///
    /// Returns the attributes that were broadcast.
    pub fn apply(&mut self, new: AppConfig) -> Vec<Attribute> {
        let changes = self.changes(&new);
        *self = new;
        for attribute in &changes {
            ReactiveBroadcast::broadcast(attribute);
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_round_trip_shape() {
        let config = AppConfig {
            icon_size: IconSize::Large,
            conflict_policy: ConflictPolicy::Reject,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("icon_size: 32"));
        assert!(yaml.contains("conflict_policy: reject"));
    }

    #[test]
    fn test_extra_large_icons_survive_reload() {
        let config: AppConfig = serde_yaml::from_str("icon_size: 48\n").unwrap();
        assert_eq!(config.icon_size, IconSize::ExtraLarge);
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("icon_size: 48"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("theme: fleet-dark\n").unwrap();
        assert_eq!(config.theme, "fleet-dark");
        assert_eq!(config.icon_size, IconSize::Medium);
        assert_eq!(config.font_scale, 1.0);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme: [unclosed").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_apply_reports_only_changes() {
        let mut config = AppConfig::default();
        let changes = config.apply(AppConfig {
            theme: "light".into(),
            font_scale: 1.5,
            ..Default::default()
        });
        assert_eq!(
            changes,
            [Attribute::Theme("light".into()), Attribute::FontScale(1.5)]
        );
        assert_eq!(config.theme, "light");
        assert!(config.apply(config.clone()).is_empty());
    }
}
