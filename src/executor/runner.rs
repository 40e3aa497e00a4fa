//! Suite execution runner
//!
//! Manages the execution of QA scenarios against a GemPlay target.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{error, info};

use crate::http::ApiClient;
use crate::models::{RoundSummary, Scenario, ScenarioResult, SuiteConfig, TargetConfig};
use crate::scenarios;

/// Runs QA scenarios against one target environment
pub struct SuiteRunner {
    config: SuiteConfig,
    client: ApiClient,
}

impl SuiteRunner {
    /// Create a new suite runner
    pub fn new(config: SuiteConfig) -> Result<Self> {
        let client = ApiClient::with_timeout(
            &config.target.base_url,
            config.timeout_secs,
            config.target.verify_tls,
        )?;
        Ok(Self { config, client })
    }

    pub fn target(&self) -> &TargetConfig {
        &self.config.target
    }

    /// Run a single scenario
    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioResult {
        // Check if scenario should be skipped
        if self.config.skip_scenarios.contains(&scenario.number()) {
            return ScenarioResult::skip(scenario, "Skipped by configuration");
        }

        info!("Running {}", scenario);

        let result = scenarios::run_scenario(scenario, &self.client, &self.config.target).await;

        match result {
            Ok(result) => result,
            Err(e) => {
                error!("Scenario {} failed with error: {}", scenario, e);
                ScenarioResult::error(scenario, e.to_string())
            }
        }
    }

    /// Run all scenarios sequentially
    pub async fn run_all(&self) -> Result<RoundSummary> {
        info!(
            "Starting suite round against {} ({})",
            self.config.target.environment, self.config.target.base_url
        );

        let start = Instant::now();
        let mut results = Vec::new();

        for scenario in Scenario::all() {
            let result = self.run_scenario(scenario).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary = RoundSummary::new(1, &self.config.target.environment, results);

        info!(
            "Suite round completed in {}ms - Pass: {}/{} ({:.1}%)",
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Run multiple suite rounds
    pub async fn run_rounds(&self, num_rounds: u32) -> Result<Vec<RoundSummary>> {
        info!(
            "Running {} rounds against {}",
            num_rounds, self.config.target.environment
        );

        let mut summaries = Vec::new();

        for round in 1..=num_rounds {
            info!("=== Round {}/{} ===", round, num_rounds);

            let mut results = Vec::new();

            for scenario in Scenario::all() {
                let result = self.run_scenario(scenario).await;
                results.push(result);
            }

            let summary = RoundSummary::new(round, &self.config.target.environment, results);

            info!(
                "Round {} completed: {}/{} passed ({:.1}%)",
                round,
                summary.passed,
                summary.total,
                summary.pass_rate()
            );

            summaries.push(summary);
        }

        Ok(summaries)
    }

    /// Run specific scenarios
    pub async fn run_scenarios(&self, selected: &[Scenario]) -> Result<RoundSummary> {
        info!(
            "Running {} selected scenarios against {}",
            selected.len(),
            self.config.target.environment
        );

        let mut results = Vec::new();

        for &scenario in selected {
            let result = self.run_scenario(scenario).await;
            info!("  {}", result);
            results.push(result);
        }

        Ok(RoundSummary::new(
            1,
            &self.config.target.environment,
            results,
        ))
    }
}

/// Runner that exercises the same suite on several environments in sequence
pub struct MultiTargetRunner {
    targets: Vec<TargetConfig>,
    rounds: u32,
    timeout_secs: u64,
}

impl MultiTargetRunner {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            rounds: 1,
            timeout_secs: 30,
        }
    }

    pub fn add_target(mut self, target: TargetConfig) -> Self {
        self.targets.push(target);
        self
    }

    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Run the suite against every configured target
    pub async fn run_all(&self) -> Result<Vec<(String, Vec<RoundSummary>)>> {
        let mut all_results = Vec::new();

        for target in &self.targets {
            info!("Testing {} at {}", target.environment, target.base_url);

            let config = SuiteConfig::new(target.clone().with_timeout(self.timeout_secs))
                .with_rounds(self.rounds);

            let runner = SuiteRunner::new(config)?;
            let summaries = runner.run_rounds(self.rounds).await?;

            all_results.push((target.environment.clone(), summaries));
        }

        Ok(all_results)
    }
}

impl Default for MultiTargetRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot full suite run against a target
pub async fn quick_run(target: TargetConfig) -> Result<RoundSummary> {
    let runner = SuiteRunner::new(SuiteConfig::new(target))?;
    runner.run_all().await
}

/// Run a single scenario by number
pub async fn run_scenario_by_number(
    target: TargetConfig,
    number: u8,
) -> Result<ScenarioResult> {
    let scenario =
        Scenario::from_number(number).context(format!("Invalid scenario number: {number}"))?;

    let runner = SuiteRunner::new(SuiteConfig::new(target))?;
    Ok(runner.run_scenario(scenario).await)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_runner_creation() {
        let target = TargetConfig::new("preview", "http://127.0.0.1:8001");
        let runner = SuiteRunner::new(SuiteConfig::new(target));
        assert!(runner.is_ok());
    }

    #[test]
    fn test_multi_target_builder() {
        let runner = MultiTargetRunner::new()
            .add_target(TargetConfig::new("preview", "https://preview.gemplay.app"))
            .add_target(TargetConfig::new("staging", "https://staging.gemplay.app"))
            .rounds(5);

        assert_eq!(runner.targets.len(), 2);
        assert_eq!(runner.rounds, 5);
    }
}
