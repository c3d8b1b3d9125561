//! Configuration for the hackulus binary.
//!
//! Loaded from .hackulus.yml or ~/.config/hackulus/hackulus.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hackulus")
                .join("hackulus.db"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .hackulus.yml in current directory
    /// 3. ~/.config/hackulus/hackulus.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".hackulus.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Failed to load .hackulus.yml: {}", e),
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("hackulus").join("hackulus.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load {}: {}", user_config.display(), e),
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Replace the database path, e.g. from `--db`.
    pub fn with_db_path(mut self, db_path: Option<&PathBuf>) -> Self {
        if let Some(path) = db_path {
            self.storage.db_path = path.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.db_path.as_os_str().is_empty() {
            eyre::bail!("storage.db-path cannot be empty");
        }
        if self.log_level.trim().is_empty() {
            eyre::bail!("log-level cannot be empty");
        }
        Ok(())
    }
}
