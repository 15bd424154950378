//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::animation::RetryPolicy;
use crate::branding::APP_DATA_DIR;

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// User interface preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// Redraw interval while something is animating, in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Draw the character pointer at the mouse position
    #[serde(default = "default_true")]
    pub show_pointer: bool,
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            frame_interval_ms: default_frame_interval_ms(),
            show_pointer: true,
        }
    }
}

impl UiConfig {
    /// Frame interval as a `Duration`.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Animation and scroll timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Interval between hero mount checks
    #[serde(default = "default_mount_poll_interval_ms")]
    pub mount_poll_interval_ms: u64,
    /// Failed mount checks before the hero entrance is abandoned; 0 waits forever
    #[serde(default = "default_max_mount_attempts")]
    pub max_mount_attempts: u32,
    /// Delay before a fragment target is resolved
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,
    /// Length of a smooth scroll
    #[serde(default = "default_smooth_scroll_ms")]
    pub smooth_scroll_ms: u64,
    /// Delay between picker card reveals
    #[serde(default = "default_card_stagger_ms")]
    pub card_stagger_ms: u64,
}

const fn default_mount_poll_interval_ms() -> u64 {
    100
}

const fn default_max_mount_attempts() -> u32 {
    100
}

const fn default_scroll_settle_ms() -> u64 {
    100
}

const fn default_smooth_scroll_ms() -> u64 {
    450
}

const fn default_card_stagger_ms() -> u64 {
    50
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mount_poll_interval_ms: default_mount_poll_interval_ms(),
            max_mount_attempts: default_max_mount_attempts(),
            scroll_settle_ms: default_scroll_settle_ms(),
            smooth_scroll_ms: default_smooth_scroll_ms(),
            card_stagger_ms: default_card_stagger_ms(),
        }
    }
}

impl AnimationConfig {
    /// Mount polling policy for the hero entrance.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.mount_poll_interval_ms),
            max_attempts: match self.max_mount_attempts {
                0 => None,
                max => Some(max),
            },
        }
    }

    /// Fragment settle delay.
    #[must_use]
    pub const fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    /// Smooth scroll length.
    #[must_use]
    pub const fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }

    /// Card reveal stagger.
    #[must_use]
    pub const fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.card_stagger_ms)
    }
}

/// Character selection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Remember the equipped character between runs
    #[serde(default = "default_true")]
    pub persist: bool,
    /// JSON catalog replacing the built-in characters
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Base directory for character icon paths
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            persist: true,
            catalog_path: None,
            assets_dir: None,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Synchronize/config.toml`
/// - macOS: `~/Library/Application Support/Synchronize/config.toml`
/// - Windows: `%APPDATA%\Synchronize\config.toml`
///
/// # Validation
///
/// - every interval except `card_stagger_ms` must be non-zero
/// - `max_mount_attempts = 0` disables the mount retry cap
/// - `catalog_path` must exist if set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// Animation timing
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Character selection
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/Synchronize/`
    /// - macOS: `~/Library/Application Support/Synchronize/`
    /// - Windows: `%APPDATA%\Synchronize\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DATA_DIR);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path using atomic write.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("ui.frame_interval_ms", self.ui.frame_interval_ms),
            ("animation.mount_poll_interval_ms", self.animation.mount_poll_interval_ms),
            ("animation.scroll_settle_ms", self.animation.scroll_settle_ms),
            ("animation.smooth_scroll_ms", self.animation.smooth_scroll_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                anyhow::bail!("{name} must be greater than zero");
            }
        }

        if let Some(catalog_path) = &self.selection.catalog_path {
            if !catalog_path.exists() {
                anyhow::bail!("Catalog file does not exist: {}", catalog_path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert_eq!(config.ui.frame_interval_ms, 16);
        assert!(config.ui.show_pointer);
        assert_eq!(config.animation.mount_poll_interval_ms, 100);
        assert_eq!(config.animation.max_mount_attempts, 100);
        assert_eq!(config.animation.scroll_settle_ms, 100);
        assert!(config.selection.persist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_intervals() {
        let mut config = Config::new();
        config.animation.scroll_settle_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.ui.frame_interval_ms = 0;
        assert!(config.validate().is_err());

        // Unbounded waiting is allowed
        let mut config = Config::new();
        config.animation.max_mount_attempts = 0;
        assert!(config.validate().is_ok());
        assert_eq!(config.animation.retry_policy().max_attempts, None);

        // A zero stagger just reveals every card together
        config.animation.card_stagger_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_catalog_path() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = temp_dir.path().join("catalog.json");

        let mut config = Config::new();
        config.selection.catalog_path = Some(catalog.clone());
        assert!(config.validate().is_err());

        fs::write(&catalog, "{}").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.ui.theme_mode = ThemeMode::Light;
        config.animation.max_mount_attempts = 0;
        config.selection.persist = false;

        config.save_to(&config_file).unwrap();
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[animation]\nscroll_settle_ms = 250\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.animation.scroll_settle_ms, 250);
        assert_eq!(loaded.animation.mount_poll_interval_ms, 100);
        assert_eq!(loaded.ui, UiConfig::default());
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = AnimationConfig::default();
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.scroll_settle(), Duration::from_millis(100));
    }
}
