use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::location::DEFAULT_LOCATION_ID;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Environment variable that injects an API key, taking precedence over any saved override.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "cebu"
/// timezone_offset_hours = 8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Injected API key. Wins over the saved override.
    pub api_key: Option<String>,

    /// Last-resort key used when neither an injected key nor an override exists.
    pub default_api_key: Option<String>,

    pub base_url: String,

    /// Icon URL with an `{icon}` placeholder for the condition icon code.
    pub icon_url_template: String,

    pub default_location: String,

    /// Bucket forecast days in this UTC offset instead of the city's own.
    pub timezone_offset_hours: Option<i32>,

    pub map_zoom: u8,

    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_string(),
            default_location: DEFAULT_LOCATION_ID.to_string(),
            timezone_offset_hours: None,
            map_zoom: DEFAULT_MAP_ZOOM,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Directory holding `config.toml` and the credential store.
    pub fn config_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathery", "weathery")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().to_path_buf())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_api_key_var(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_var(&mut self, value: Option<String>) {
        if let Some(key) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Explicit offset for day bucketing, if one is configured and in range.
    pub fn timezone_override(&self) -> Option<FixedOffset> {
        self.timezone_offset_hours
            .and_then(|hours| FixedOffset::east_opt(hours * 3600))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
