//! Target environment models
//!
//! Describes the GemPlay deployment a suite run is pointed at.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Admin credentials used by admin-only scenarios
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: "admin@gemplay.com".to_string(),
            password: "Admin123!".to_string(),
        }
    }
}

/// Target configuration for a GemPlay deployment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Environment name (preview, staging, ...)
    pub environment: String,
    /// API base URL, e.g. `https://preview.gemplay.app`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Verify TLS certificates
    pub verify_tls: bool,
    /// Admin credentials for admin-only scenarios
    pub admin: AdminCredentials,
}

impl TargetConfig {
    pub fn new(environment: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            base_url: base_url.into(),
            timeout_secs: 30,
            verify_tls: true,
            admin: AdminCredentials::default(),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_admin(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin = AdminCredentials {
            email: email.into(),
            password: password.into(),
        };
        self
    }

    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}

/// Suite run configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub target: TargetConfig,
    pub rounds: u32,
    pub parallel: bool,
    pub timeout_secs: u64,
    pub skip_scenarios: Vec<u8>,
}

impl SuiteConfig {
    pub fn new(target: TargetConfig) -> Self {
        let timeout_secs = target.timeout_secs;
        Self {
            target,
            rounds: 1,
            parallel: false,
            timeout_secs,
            skip_scenarios: Vec::new(),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn skip_scenario(mut self, number: u8) -> Self {
        self.skip_scenarios.push(number);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_config() {
        let target = TargetConfig::new("preview", "https://preview.gemplay.app")
            .with_timeout(60)
            .with_admin("ops@gemplay.com", "secret");

        assert_eq!(target.environment, "preview");
        assert_eq!(target.timeout_secs, 60);
        assert_eq!(target.admin.email, "ops@gemplay.com");
        assert!(target.verify_tls);
    }

    #[test]
    fn test_suite_config() {
        let target = TargetConfig::new("preview", "http://127.0.0.1:8001");
        let config = SuiteConfig::new(target)
            .with_rounds(5)
            .parallel(true)
            .skip_scenario(11);

        assert_eq!(config.rounds, 5);
        assert!(config.parallel);
        assert_eq!(config.skip_scenarios, vec![11]);
    }

    #[test]
    fn test_default_admin_credentials() {
        let creds = AdminCredentials::default();
        assert_eq!(creds.email, "admin@gemplay.com");
    }
}
