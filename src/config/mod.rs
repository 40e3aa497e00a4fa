//! Configuration module
//!
//! Handles loading and managing configuration.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod env;
pub mod file;
pub mod profile;

pub use env::{EnvBuilder, EnvConfig};
pub use file::{ConfigFile, EnvironmentConfig};
pub use profile::{ProfileManager, SuiteProfile};

use crate::models::AdminCredentials;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default environment name
    pub default_environment: String,

    /// Default number of suite rounds
    pub default_rounds: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Enable parallel execution by default
    pub parallel: bool,

    /// Maximum concurrent scenarios
    pub max_concurrent: usize,

    /// Admin credentials for admin-only scenarios
    pub admin: AdminCredentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_environment: "preview".to_string(),
            default_rounds: 1,
            timeout_secs: 30,
            parallel: false,
            max_concurrent: 4,
            admin: AdminCredentials::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_environment, "preview");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.admin.email, "admin@gemplay.com");
    }

    #[test]
    fn test_save_and_load_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = AppConfig::default();
        config.default_rounds = 3;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.default_rounds, 3);
    }
}
