//! Scenario result models for GemPlay API testing
//!
//! Defines scenarios, results, and status types.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// All 14 QA scenarios for the GemPlay backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    // Auth scenarios (1-3)
    UserRegistration,
    UserLogin,
    AdminAuth,

    // Economy scenarios (4-7)
    GemCatalog,
    GemPurchase,
    GemSale,
    GiftCommission,

    // Game scenarios (8-11)
    GameCreation,
    GameJoin,
    RpsResolution,
    BetTimeoutRecovery,

    // Bot scenarios (12-14)
    BotLimits,
    CycleCompliance,
    BotRoiStats,
}

impl Scenario {
    /// Get scenario number (1-14)
    pub fn number(&self) -> u8 {
        match self {
            Scenario::UserRegistration => 1,
            Scenario::UserLogin => 2,
            Scenario::AdminAuth => 3,
            Scenario::GemCatalog => 4,
            Scenario::GemPurchase => 5,
            Scenario::GemSale => 6,
            Scenario::GiftCommission => 7,
            Scenario::GameCreation => 8,
            Scenario::GameJoin => 9,
            Scenario::RpsResolution => 10,
            Scenario::BetTimeoutRecovery => 11,
            Scenario::BotLimits => 12,
            Scenario::CycleCompliance => 13,
            Scenario::BotRoiStats => 14,
        }
    }

    /// Get scenario name
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::UserRegistration => "User Registration",
            Scenario::UserLogin => "User Login",
            Scenario::AdminAuth => "Admin Auth",
            Scenario::GemCatalog => "Gem Catalog",
            Scenario::GemPurchase => "Gem Purchase",
            Scenario::GemSale => "Gem Sale",
            Scenario::GiftCommission => "Gift Commission",
            Scenario::GameCreation => "Game Creation",
            Scenario::GameJoin => "Game Join",
            Scenario::RpsResolution => "RPS Resolution",
            Scenario::BetTimeoutRecovery => "Bet Timeout Recovery",
            Scenario::BotLimits => "Bot Limits",
            Scenario::CycleCompliance => "Cycle Compliance",
            Scenario::BotRoiStats => "Bot ROI Stats",
        }
    }

    /// Get scenario category
    pub fn category(&self) -> &'static str {
        match self {
            Scenario::UserRegistration | Scenario::UserLogin | Scenario::AdminAuth => "Auth",
            Scenario::GemCatalog
            | Scenario::GemPurchase
            | Scenario::GemSale
            | Scenario::GiftCommission => "Economy",
            Scenario::GameCreation
            | Scenario::GameJoin
            | Scenario::RpsResolution
            | Scenario::BetTimeoutRecovery => "Games",
            _ => "Bots",
        }
    }

    /// Whether the scenario needs the admin bearer token
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Scenario::AdminAuth
                | Scenario::BetTimeoutRecovery
                | Scenario::BotLimits
                | Scenario::CycleCompliance
                | Scenario::BotRoiStats
        )
    }

    /// Get all scenarios in execution order
    pub fn all() -> Vec<Scenario> {
        vec![
            Scenario::UserRegistration,
            Scenario::UserLogin,
            Scenario::AdminAuth,
            Scenario::GemCatalog,
            Scenario::GemPurchase,
            Scenario::GemSale,
            Scenario::GiftCommission,
            Scenario::GameCreation,
            Scenario::GameJoin,
            Scenario::RpsResolution,
            Scenario::BetTimeoutRecovery,
            Scenario::BotLimits,
            Scenario::CycleCompliance,
            Scenario::BotRoiStats,
        ]
    }

    /// Parse from scenario number
    pub fn from_number(n: u8) -> Option<Scenario> {
        Scenario::all().into_iter().find(|s| s.number() == n)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scenario {}: {}", self.number(), self.name())
    }
}

/// Scenario execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl ScenarioStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            ScenarioStatus::Pass => "✓",
            ScenarioStatus::Fail => "✗",
            ScenarioStatus::Skip => "○",
            ScenarioStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScenarioStatus::Pass)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioStatus::Pass => write!(f, "PASS"),
            ScenarioStatus::Fail => write!(f, "FAIL"),
            ScenarioStatus::Skip => write!(f, "SKIP"),
            ScenarioStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single scenario execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ScenarioResult {
    pub fn pass(scenario: Scenario, duration_ms: u64) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Pass,
            duration_ms,
            message: None,
            details: None,
        }
    }

    pub fn fail(scenario: Scenario, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Fail,
            duration_ms,
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn skip(scenario: Scenario, reason: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Skip,
            duration_ms: 0,
            message: Some(reason.into()),
            details: None,
        }
    }

    pub fn error(scenario: Scenario, error: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Error,
            duration_ms: 0,
            message: Some(error.into()),
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Build a result from accumulated check lines
    pub fn from_checks(
        scenario: Scenario,
        all_passed: bool,
        duration_ms: u64,
        details: Vec<String>,
    ) -> Self {
        Self {
            scenario,
            status: if all_passed {
                ScenarioStatus::Pass
            } else {
                ScenarioStatus::Fail
            },
            duration_ms,
            message: Some(details.join("\n")),
            details: None,
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.scenario,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one suite round against an environment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub environment: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl RoundSummary {
    pub fn new(round: u32, environment: impl Into<String>, results: Vec<ScenarioResult>) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Fail)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Skip)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Error)
            .count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            round,
            environment: environment.into(),
            total,
            passed,
            failed,
            skipped,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// True when any scenario finished Fail or Error
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errors > 0
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.environment)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_numbers() {
        assert_eq!(Scenario::UserRegistration.number(), 1);
        assert_eq!(Scenario::BotRoiStats.number(), 14);
    }

    #[test]
    fn test_scenario_from_number() {
        assert_eq!(Scenario::from_number(1), Some(Scenario::UserRegistration));
        assert_eq!(Scenario::from_number(14), Some(Scenario::BotRoiStats));
        assert_eq!(Scenario::from_number(15), None);
    }

    #[test]
    fn test_all_scenarios() {
        let all = Scenario::all();
        assert_eq!(all.len(), 14);
        for (i, scenario) in all.iter().enumerate() {
            assert_eq!(scenario.number() as usize, i + 1);
        }
    }

    #[test]
    fn test_scenario_categories() {
        assert_eq!(Scenario::UserLogin.category(), "Auth");
        assert_eq!(Scenario::GiftCommission.category(), "Economy");
        assert_eq!(Scenario::RpsResolution.category(), "Games");
        assert_eq!(Scenario::CycleCompliance.category(), "Bots");
    }

    #[test]
    fn test_admin_requirement() {
        assert!(Scenario::BotLimits.requires_admin());
        assert!(!Scenario::GemPurchase.requires_admin());
    }

    #[test]
    fn test_result_creation() {
        let result = ScenarioResult::pass(Scenario::UserLogin, 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
    }

    #[test]
    fn test_round_summary() {
        let results = vec![
            ScenarioResult::pass(Scenario::UserRegistration, 100),
            ScenarioResult::fail(Scenario::GemPurchase, 50, "balance mismatch"),
            ScenarioResult::skip(Scenario::BotLimits, "no admin token"),
        ];

        let summary = RoundSummary::new(1, "preview", results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.has_failures());
    }
}
