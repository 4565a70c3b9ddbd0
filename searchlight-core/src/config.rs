//! Controller configuration.
//!
//! Loaded from `$SEARCHLIGHT_CONFIG`, or `searchlight/config.json` under the
//! user's config directory. A missing or corrupt file yields the defaults.

use crate::chrome::{ChromeStyle, ChromeTimings};
use crate::error::{LightError, Result};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV: &str = "SEARCHLIGHT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Screen identity; scopes the persisted mode preference.
    pub screen: String,
    /// Directory holding preference files.
    pub prefs_dir: PathBuf,
    /// How chrome is hidden.
    pub chrome_style: ChromeStyle,
    /// Delay before the action bar is hidden, in milliseconds.
    pub chrome_secondary_delay_ms: u64,
    /// Further delay before the status bar is hidden, in milliseconds.
    pub chrome_primary_delay_ms: u64,
    /// Cross-fade duration when the light turns on, in milliseconds.
    pub fade_in_ms: u64,
    /// Cross-fade duration when the light turns off, in milliseconds.
    pub fade_out_ms: u64,
    /// Turn the light on as soon as the camera is ready.
    pub torch_on_when_ready: bool,
    /// LED class directory.
    pub led_class_dir: PathBuf,
    /// Named LED to drive; discovered when unset.
    pub led_name: Option<String>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            screen: "SearchLight".to_string(),
            prefs_dir: config_root().join("searchlight").join("prefs"),
            chrome_style: ChromeStyle::default(),
            chrome_secondary_delay_ms: 2500,
            chrome_primary_delay_ms: 200,
            fade_in_ms: 200,
            fade_out_ms: 300,
            torch_on_when_ready: true,
            led_class_dir: PathBuf::from(crate::sysfs::LED_CLASS_DIR),
            led_name: None,
        }
    }
}

impl LightConfig {
    /// Default configuration path.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => config_root().join("searchlight").join("config.json"),
        }
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load from `path`, falling back to defaults when missing or corrupt.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("configuration {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Self>(&json) {
            Ok(config) => {
                config.validate()?;
                info!("configuration loaded from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("failed to parse configuration, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Save to `path` atomically.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(temp_path, path)?;
        info!("configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the controller can't work with.
    pub fn validate(&self) -> Result<()> {
        if self.screen.is_empty() {
            return Err(LightError::Config("screen name is empty".to_string()));
        }
        if self.screen.contains(['/', '\\']) {
            return Err(LightError::Config(format!(
                "screen name {:?} contains a path separator",
                self.screen
            )));
        }
        Ok(())
    }

    /// Chrome hide delays.
    pub fn chrome_timings(&self) -> ChromeTimings {
        ChromeTimings {
            secondary: Duration::from_millis(self.chrome_secondary_delay_ms),
            primary: Duration::from_millis(self.chrome_primary_delay_ms),
        }
    }
}

fn config_root() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(dir);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config"),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LightConfig::default();
        assert_eq!(config.screen, "SearchLight");
        assert_eq!(config.chrome_style, ChromeStyle::Delayed);
        assert!(config.torch_on_when_ready);

        let timings = config.chrome_timings();
        assert_eq!(timings.secondary, Duration::from_millis(2500));
        assert_eq!(timings.primary, Duration::from_millis(200));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"chrome_style": "platform", "led_name": "white:flash"}"#)
            .unwrap();

        let config = LightConfig::load_from(&path).unwrap();
        assert_eq!(config.chrome_style, ChromeStyle::Platform);
        assert_eq!(config.led_name.as_deref(), Some("white:flash"));
        assert_eq!(config.fade_out_ms, 300);
    }

    #[test]
    fn test_missing_and_corrupt_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(LightConfig::load_from(&path).unwrap(), LightConfig::default());

        std::fs::write(&path, "[").unwrap();
        assert_eq!(LightConfig::load_from(&path).unwrap(), LightConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = LightConfig {
            torch_on_when_ready: false,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(LightConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_screen_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"screen": "../escape"}"#).unwrap();

        let err = LightConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, LightError::Config(_)));
    }
}
