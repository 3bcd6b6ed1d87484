use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::suggest::Catalog;

/// Settings for the WeatherAPI.com provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides `http://api.weatherapi.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Whole-request timeout. Unset means requests may wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// catalog = ["Oslo", "Bergen"]
///
/// [weatherapi]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Place names offered as suggestions. Empty means the built-in list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weatherapi: Option<ProviderConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key, keeping any other provider settings.
    pub fn set_api_key(&mut self, api_key: String) {
        match self.weatherapi.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.weatherapi =
                    Some(ProviderConfig { api_key, base_url: None, timeout_secs: None });
            }
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.weatherapi
            .as_ref()
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.weatherapi.as_ref().and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.weatherapi.as_ref().and_then(|cfg| cfg.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn catalog(&self) -> Catalog {
        if self.catalog.is_empty() {
            Catalog::default()
        } else {
            Catalog::new(self.catalog.iter().cloned())
        }
    }
}
