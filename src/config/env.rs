//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "GEMPLAY_QA";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from GEMPLAY_QA_BASE_URL
    pub base_url: Option<String>,
    /// Environment name from GEMPLAY_QA_ENV
    pub environment: Option<String>,
    /// Admin email from GEMPLAY_QA_ADMIN_EMAIL
    pub admin_email: Option<String>,
    /// Admin password from GEMPLAY_QA_ADMIN_PASSWORD
    pub admin_password: Option<String>,
    /// Timeout from GEMPLAY_QA_TIMEOUT
    pub timeout: Option<u64>,
    /// Rounds from GEMPLAY_QA_ROUNDS
    pub rounds: Option<u32>,
    /// Parallel from GEMPLAY_QA_PARALLEL
    pub parallel: Option<bool>,
    /// Config file from GEMPLAY_QA_CONFIG
    pub config_file: Option<String>,
    /// Verbose from GEMPLAY_QA_VERBOSE
    pub verbose: Option<bool>,
    /// Output format from GEMPLAY_QA_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            environment: get_env("ENV"),
            admin_email: get_env("ADMIN_EMAIL"),
            admin_password: get_env("ADMIN_PASSWORD"),
            timeout: get_env_parse("TIMEOUT"),
            rounds: get_env_parse("ROUNDS"),
            parallel: get_env_bool("PARALLEL"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
            format: get_env("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.environment.is_some()
            || self.admin_email.is_some()
            || self.admin_password.is_some()
            || self.timeout.is_some()
            || self.rounds.is_some()
            || self.parallel.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
            || self.format.is_some()
    }

    /// Get base URL with fallback
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url.clone().unwrap_or_else(|| default.to_string())
    }

    /// Get environment name with fallback
    pub fn environment_or(&self, default: &str) -> String {
        self.environment
            .clone()
            .unwrap_or_else(|| default.to_string())
    }

    /// Get timeout with fallback
    pub fn timeout_or(&self, default: u64) -> u64 {
        self.timeout.unwrap_or(default)
    }

    /// Get rounds with fallback
    pub fn rounds_or(&self, default: u32) -> u32 {
        self.rounds.unwrap_or(default)
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_BASE_URL:       {:?}", ENV_PREFIX, self.base_url);
        println!("  {}_ENV:            {:?}", ENV_PREFIX, self.environment);
        println!("  {}_ADMIN_EMAIL:    {:?}", ENV_PREFIX, self.admin_email);
        println!(
            "  {}_ADMIN_PASSWORD: {}",
            ENV_PREFIX,
            if self.admin_password.is_some() {
                "<set>"
            } else {
                "None"
            }
        );
        println!("  {}_TIMEOUT:        {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_ROUNDS:         {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_PARALLEL:       {:?}", ENV_PREFIX, self.parallel);
        println!("  {}_CONFIG:         {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_FORMAT:         {:?}", ENV_PREFIX, self.format);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_BASE_URL"), url.into()));
        self
    }

    /// Set environment name
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_ENV"), env.into()));
        self
    }

    /// Set admin email
    pub fn admin_email(mut self, email: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_ADMIN_EMAIL"), email.into()));
        self
    }

    /// Set admin password
    pub fn admin_password(mut self, password: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_ADMIN_PASSWORD"), password.into()));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TIMEOUT"), timeout.to_string()));
        self
    }

    /// Set rounds
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_ROUNDS"), rounds.to_string()));
        self
    }

    /// Set parallel
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PARALLEL"), parallel.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all GEMPLAY_QA environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_BASE_URL        API base URL");
    println!("  {ENV_PREFIX}_ENV             Environment name (preview, staging, ...)");
    println!("  {ENV_PREFIX}_ADMIN_EMAIL     Admin account email");
    println!("  {ENV_PREFIX}_ADMIN_PASSWORD  Admin account password");
    println!("  {ENV_PREFIX}_TIMEOUT         Request timeout in seconds");
    println!("  {ENV_PREFIX}_ROUNDS          Number of suite rounds");
    println!("  {ENV_PREFIX}_PARALLEL        Enable parallel execution (true/false)");
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE         Enable verbose output (true/false)");
    println!("  {ENV_PREFIX}_FORMAT          Output format (table, json, csv)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_BASE_URL=https://preview.gemplay.app");
    println!("  export {ENV_PREFIX}_ENV=preview");
    println!("  gemplay-qa test --all");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.environment.is_none());
    }

    #[test]
    fn test_env_config_fallback() {
        let config = EnvConfig::default();
        assert_eq!(
            config.base_url_or("http://127.0.0.1:8001"),
            "http://127.0.0.1:8001"
        );
        assert_eq!(config.environment_or("preview"), "preview");
        assert_eq!(config.timeout_or(30), 30);
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .base_url("https://staging.gemplay.app")
            .environment("staging")
            .timeout(60)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(
            config.base_url,
            Some("https://staging.gemplay.app".to_string())
        );
        assert_eq!(config.environment, Some("staging".to_string()));
        assert_eq!(config.timeout, Some(60));
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().parallel(true).apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.parallel, Some(true));
    }

    #[test]
    fn test_has_any() {
        let empty = EnvConfig::default();
        assert!(!empty.has_any());

        let with_url = EnvConfig {
            base_url: Some("http://127.0.0.1:8001".to_string()),
            ..Default::default()
        };
        assert!(with_url.has_any());
    }
}
