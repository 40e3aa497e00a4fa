//! Configuration file support
//!
//! Loads suite configuration from YAML or JSON files, with a standard
//! search order for default locations.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::profile::SuiteProfile;
use super::AppConfig;
use crate::models::TargetConfig;

/// Default configuration file locations, in order of precedence
const CONFIG_LOCATIONS: &[&str] = &[
    "./gemplay-qa.yaml",
    "./gemplay-qa.yml",
    "./.gemplay-qa.yaml",
    "./.gemplay-qa/config.yaml",
    "~/.config/gemplay-qa/config.yaml",
    "~/.gemplay-qa.yaml",
];

/// Supported config file versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0", "1.1"];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Config file version
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// Named suite profiles
    #[serde(default)]
    pub suite_profiles: Vec<SuiteProfile>,

    /// Target environments
    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            suite_profiles: Vec::new(),
            environments: Vec::new(),
        }
    }
}

/// Environment entry in the config file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (preview, staging, production, local)
    pub name: String,

    /// API base URL
    pub base_url: String,

    /// Verify TLS certificates
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Admin email override for this environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,

    /// Admin password override for this environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,

    /// Additional key-value settings
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_yaml::Value>,
}

fn default_verify_tls() -> bool {
    true
}

impl EnvironmentConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            verify_tls: true,
            admin_email: None,
            admin_password: None,
            extra: HashMap::new(),
        }
    }

    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn with_admin(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self.admin_password = Some(password.into());
        self
    }

    /// Convert into a runnable target, filling admin credentials from
    /// the application config where this entry has no override.
    pub fn to_target(&self, app: &AppConfig) -> TargetConfig {
        let mut target = TargetConfig::new(&self.name, &self.base_url);
        target.timeout_secs = app.timeout_secs;
        target.verify_tls = self.verify_tls;
        target.admin.email = self
            .admin_email
            .clone()
            .unwrap_or_else(|| app.admin.email.clone());
        target.admin.password = self
            .admin_password
            .clone()
            .unwrap_or_else(|| app.admin.password.clone());
        target
    }
}

impl ConfigFile {
    /// Find the first existing config file in the standard locations
    pub fn find() -> Option<PathBuf> {
        for location in CONFIG_LOCATIONS {
            let path = expand_path(location);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Load from the first config file found, or return defaults
    pub fn load_default() -> Result<Self> {
        match Self::find() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save to a path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config as YAML")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            anyhow::bail!(
                "Unsupported config version: {} (supported: {})",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            );
        }

        for profile in &self.suite_profiles {
            for &number in &profile.scenarios {
                if !(1..=14).contains(&number) {
                    anyhow::bail!(
                        "Profile '{}' references invalid scenario number: {}",
                        profile.name,
                        number
                    );
                }
            }
        }

        for env in &self.environments {
            if env.base_url.is_empty() {
                anyhow::bail!("Environment '{}' has no base_url", env.name);
            }
            if !env.base_url.starts_with("http://") && !env.base_url.starts_with("https://") {
                anyhow::bail!(
                    "Environment '{}' base_url must start with http:// or https://",
                    env.name
                );
            }
        }

        Ok(())
    }

    /// Build an example configuration
    pub fn example() -> Self {
        Self {
            version: "1.0".to_string(),
            app: AppConfig::default(),
            suite_profiles: vec![SuiteProfile::smoke(), SuiteProfile::full()],
            environments: vec![
                EnvironmentConfig::new("local", "http://127.0.0.1:8001").insecure(),
                EnvironmentConfig::new("preview", "https://preview.gemplay.app"),
                EnvironmentConfig::new("staging", "https://staging.gemplay.app"),
            ],
        }
    }

    /// Look up an environment by name
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Look up a suite profile by name
    pub fn suite_profile(&self, name: &str) -> Option<&SuiteProfile> {
        self.suite_profiles.iter().find(|p| p.name == name)
    }

    /// Merge another config file into this one, with the other taking
    /// precedence for duplicated names.
    pub fn merge(&mut self, other: ConfigFile) {
        self.app = other.app;

        for profile in other.suite_profiles {
            if let Some(existing) = self
                .suite_profiles
                .iter_mut()
                .find(|p| p.name == profile.name)
            {
                *existing = profile;
            } else {
                self.suite_profiles.push(profile);
            }
        }

        for env in other.environments {
            if let Some(existing) = self.environments.iter_mut().find(|e| e.name == env.name) {
                *existing = env;
            } else {
                self.environments.push(env);
            }
        }
    }
}

/// Expand `~` to the home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if a path looks like a YAML file
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file() {
        let config = ConfigFile::default();
        assert_eq!(config.version, "1.0");
        assert!(config.environments.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_validates() {
        let config = ConfigFile::example();
        assert!(config.validate().is_ok());
        assert!(config.environment("preview").is_some());
        assert!(config.suite_profile("smoke").is_some());
    }

    #[test]
    fn test_invalid_version_rejected() {
        let mut config = ConfigFile::default();
        config.version = "9.9".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scenario_number_rejected() {
        let mut config = ConfigFile::default();
        config
            .suite_profiles
            .push(SuiteProfile::new("bad").with_scenarios(vec![1, 15]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = ConfigFile::default();
        config
            .environments
            .push(EnvironmentConfig::new("broken", "ftp://nope"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gemplay-qa.yaml");

        let config = ConfigFile::example();
        config.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.environments.len(), 3);
        assert_eq!(loaded.environment("local").unwrap().verify_tls, false);
    }

    #[test]
    fn test_merge_overrides_by_name() {
        let mut base = ConfigFile::example();
        let mut overlay = ConfigFile::default();
        overlay
            .environments
            .push(EnvironmentConfig::new("preview", "https://preview2.gemplay.app"));
        overlay
            .environments
            .push(EnvironmentConfig::new("qa", "https://qa.gemplay.app"));

        base.merge(overlay);

        assert_eq!(
            base.environment("preview").unwrap().base_url,
            "https://preview2.gemplay.app"
        );
        assert!(base.environment("qa").is_some());
    }

    #[test]
    fn test_environment_to_target_uses_app_admin() {
        let app = AppConfig::default();
        let env = EnvironmentConfig::new("staging", "https://staging.gemplay.app");
        let target = env.to_target(&app);
        assert_eq!(target.admin.email, "admin@gemplay.com");

        let env = env.with_admin("staging-admin@gemplay.com", "pw");
        let target = env.to_target(&app);
        assert_eq!(target.admin.email, "staging-admin@gemplay.com");
    }

    #[test]
    fn test_expand_path_tilde() {
        let path = expand_path("~/.gemplay-qa.yaml");
        assert!(!path.to_string_lossy().starts_with('~') || dirs::home_dir().is_none());
    }
}
