//! Configuration for the seersync CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL returning the Flash platform version string
    pub flash_version_url: String,

    /// URL of the Flash configuration container
    pub flash_container_url: String,

    /// Base URL of the Html5 platform
    pub html5_base_url: String,

    /// Worker threads for Html5 asset downloads
    pub download_workers: usize,

    /// Per-file retries for transient download failures
    pub download_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flash_version_url: "https://seer.61.com/version/zzz_config.txt".to_string(),
            flash_container_url: "https://seer.61.com/dll/RobotCoreDLL.swf".to_string(),
            html5_base_url: "https://seerh5.61.com".to_string(),
            download_workers: 20,
            download_retries: 2,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("seersync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.flash_container_url.ends_with(".swf"));
        assert_eq!(config.download_workers, 20);
        assert_eq!(config.download_retries, 2);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("download_workers = 4").unwrap();
        assert_eq!(config.download_workers, 4);
        assert_eq!(config.download_retries, 2);
        assert!(!config.html5_base_url.is_empty());
    }
}
