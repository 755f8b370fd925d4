use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::location::{FALLBACK_LOCATION, LocationQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const MAX_FORECAST_DAYS: u8 = 14;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// fallback_location = "Hong Kong"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// WeatherAPI.com key; required before anything can be fetched.
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Used when no position is available at startup.
    #[serde(default = "default_fallback_location")]
    pub fallback_location: String,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_fallback_location() -> String {
    FALLBACK_LOCATION.to_string()
}

const fn default_forecast_days() -> u8 {
    DEFAULT_FORECAST_DAYS
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            fallback_location: default_fallback_location(),
            forecast_days: default_forecast_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Returns the API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No WeatherAPI.com API key configured.\n\
                 Hint: run `weatherdash configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Blank values fall back to the built-in location.
    pub fn fallback_query(&self) -> LocationQuery {
        LocationQuery::from_search(&self.fallback_location).unwrap_or_else(LocationQuery::fallback)
    }

    /// Forecast day count limited to what the provider serves.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(1, MAX_FORECAST_DAYS)
    }

    /// Load config from the platform config directory, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
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

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
