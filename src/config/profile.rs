//! Suite profiles
//!
//! Predefined scenario selections for common runs.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Suite profile listing which scenarios to run and how
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteProfile {
    /// Profile name
    pub name: String,
    /// Description
    pub description: String,
    /// Scenario numbers to include
    pub scenarios: Vec<u8>,
    /// Number of rounds
    pub rounds: u32,
    /// Run in parallel
    pub parallel: bool,
    /// Timeout per scenario in seconds
    pub timeout_secs: u64,
    /// Tags for filtering
    pub tags: Vec<String>,
}

impl SuiteProfile {
    /// Create a new suite profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            scenarios: Vec::new(),
            rounds: 1,
            parallel: false,
            timeout_secs: 30,
            tags: Vec::new(),
        }
    }

    /// Full suite (1-14)
    pub fn full() -> Self {
        Self {
            name: "full".to_string(),
            description: "Run all 14 scenarios".to_string(),
            scenarios: (1..=14).collect(),
            rounds: 1,
            parallel: false,
            timeout_secs: 30,
            tags: vec!["comprehensive".to_string()],
        }
    }

    /// Quick smoke profile covering auth and the gem catalog
    pub fn smoke() -> Self {
        Self {
            name: "smoke".to_string(),
            description: "Quick smoke checks for auth and catalog".to_string(),
            scenarios: vec![1, 2, 4],
            rounds: 1,
            parallel: false,
            timeout_secs: 30,
            tags: vec!["quick".to_string(), "smoke".to_string()],
        }
    }

    /// Auth scenarios profile
    pub fn auth() -> Self {
        Self {
            name: "auth".to_string(),
            description: "Registration, login and admin authentication".to_string(),
            scenarios: vec![1, 2, 3],
            rounds: 1,
            parallel: false,
            timeout_secs: 30,
            tags: vec!["auth".to_string()],
        }
    }

    /// Gem economy scenarios profile
    pub fn economy() -> Self {
        Self {
            name: "economy".to_string(),
            description: "Gem catalog, purchase, sale and gift commission".to_string(),
            scenarios: vec![4, 5, 6, 7],
            rounds: 1,
            parallel: false,
            timeout_secs: 30,
            tags: vec!["economy".to_string()],
        }
    }

    /// Game scenarios profile
    pub fn games() -> Self {
        Self {
            name: "games".to_string(),
            description: "Game creation, joining, resolution and timeout recovery".to_string(),
            scenarios: vec![8, 9, 10, 11],
            rounds: 1,
            parallel: false,
            timeout_secs: 60,
            tags: vec!["games".to_string()],
        }
    }

    /// Bot scenarios profile
    pub fn bots() -> Self {
        Self {
            name: "bots".to_string(),
            description: "Bot limits, cycle compliance and ROI statistics".to_string(),
            scenarios: vec![12, 13, 14],
            rounds: 1,
            parallel: false,
            timeout_secs: 60,
            tags: vec!["bots".to_string(), "admin".to_string()],
        }
    }

    /// Stability profile: repeat the full suite several times
    pub fn stability() -> Self {
        Self {
            name: "stability".to_string(),
            description: "Full suite repeated to surface flaky behavior".to_string(),
            scenarios: (1..=14).collect(),
            rounds: 5,
            parallel: false,
            timeout_secs: 60,
            tags: vec!["stability".to_string()],
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set scenario numbers
    pub fn with_scenarios(mut self, scenarios: Vec<u8>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Set rounds
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set parallel execution
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Add tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get predefined profiles
    pub fn predefined() -> Vec<SuiteProfile> {
        vec![
            Self::full(),
            Self::smoke(),
            Self::auth(),
            Self::economy(),
            Self::games(),
            Self::bots(),
            Self::stability(),
        ]
    }

    /// Find a predefined profile by name
    pub fn find(name: &str) -> Option<SuiteProfile> {
        Self::predefined().into_iter().find(|p| p.name == name)
    }
}

/// Profile manager holding predefined and user-defined profiles
pub struct ProfileManager {
    profiles: HashMap<String, SuiteProfile>,
}

impl ProfileManager {
    /// Create a manager preloaded with the predefined profiles
    pub fn new() -> Self {
        let mut manager = Self {
            profiles: HashMap::new(),
        };

        for profile in SuiteProfile::predefined() {
            manager.profiles.insert(profile.name.clone(), profile);
        }

        manager
    }

    /// Get a profile by name
    pub fn profile(&self, name: &str) -> Option<&SuiteProfile> {
        self.profiles.get(name)
    }

    /// Add or replace a profile
    pub fn add_profile(&mut self, profile: SuiteProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// List all profiles, sorted by name
    pub fn list_profiles(&self) -> Vec<&SuiteProfile> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }
}

impl Default for ProfileManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_profile() {
        let profile = SuiteProfile::smoke();
        assert_eq!(profile.name, "smoke");
        assert_eq!(profile.scenarios, vec![1, 2, 4]);
    }

    #[test]
    fn test_full_profile() {
        let profile = SuiteProfile::full();
        assert_eq!(profile.scenarios.len(), 14);
    }

    #[test]
    fn test_bots_profile_is_admin_tagged() {
        let profile = SuiteProfile::bots();
        assert!(profile.tags.contains(&"admin".to_string()));
    }

    #[test]
    fn test_profile_manager() {
        let manager = ProfileManager::new();
        assert!(manager.profile("smoke").is_some());
        assert!(manager.profile("nope").is_none());
    }

    #[test]
    fn test_add_custom_profile() {
        let mut manager = ProfileManager::new();
        manager.add_profile(SuiteProfile::new("custom").with_scenarios(vec![5, 6]));
        assert_eq!(manager.profile("custom").unwrap().scenarios, vec![5, 6]);
    }

    #[test]
    fn test_find_profile() {
        let profile = SuiteProfile::find("economy");
        assert!(profile.is_some());
        assert_eq!(profile.unwrap().scenarios, vec![4, 5, 6, 7]);
    }
}
