//! Parallel scenario execution
//!
//! Enables concurrent execution of scenarios and of whole suites across
//! multiple target environments.

#![allow(dead_code)]

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::http::ApiClient;
use crate::models::{RoundSummary, Scenario, ScenarioResult, ScenarioStatus, TargetConfig};
use crate::scenarios;

/// Parallel scenario executor
pub struct ParallelExecutor {
    max_concurrent: usize,
    timeout_secs: u64,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Run scenarios concurrently against a single target
    ///
    /// Each scenario registers its own throwaway accounts, so they do not
    /// interfere with each other when interleaved.
    pub async fn run_scenarios_parallel(
        &self,
        target: &TargetConfig,
        selected: Vec<Scenario>,
    ) -> Result<Vec<ScenarioResult>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let client = Arc::new(ApiClient::with_timeout(
            &target.base_url,
            self.timeout_secs,
            target.verify_tls,
        )?);
        let target = Arc::new(target.clone());

        let mut handles = Vec::new();

        for scenario in selected {
            let semaphore = semaphore.clone();
            let client = client.clone();
            let target = target.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.unwrap();

                debug!("Starting parallel execution of {}", scenario);

                let result = scenarios::run_scenario(scenario, &client, &target).await;

                match result {
                    Ok(r) => r,
                    Err(e) => ScenarioResult::error(scenario, e.to_string()),
                }
            });

            handles.push(handle);
        }

        let results: Vec<ScenarioResult> = join_all(handles)
            .await
            .into_iter()
            .filter_map(|r| r.ok())
            .collect();

        Ok(results)
    }

    /// Run all 14 scenarios in parallel
    pub async fn run_all_parallel(&self, target: &TargetConfig) -> Result<RoundSummary> {
        info!(
            "Running all scenarios in parallel (max {} concurrent) against {}",
            self.max_concurrent, target.environment
        );

        let start = Instant::now();
        let results = self.run_scenarios_parallel(target, Scenario::all()).await?;

        // Sort results by scenario number
        let mut sorted_results = results;
        sorted_results.sort_by_key(|r| r.scenario.number());

        let summary = RoundSummary::new(1, &target.environment, sorted_results);

        info!(
            "Parallel execution completed in {}ms - Pass: {}/{} ({:.1}%)",
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Run the suite across multiple environments in parallel
    pub async fn run_multi_target(
        &self,
        targets: Vec<TargetConfig>,
    ) -> Result<HashMap<String, RoundSummary>> {
        info!("Running parallel suites across {} environments", targets.len());

        let start = Instant::now();
        let mut handles = Vec::new();

        for target in targets {
            let max_concurrent = self.max_concurrent;
            let timeout_secs = self.timeout_secs;

            let handle = tokio::spawn(async move {
                let executor = ParallelExecutor::new(max_concurrent).with_timeout(timeout_secs);

                let result = executor.run_all_parallel(&target).await;
                (target.environment, result)
            });

            handles.push(handle);
        }

        let results = join_all(handles).await;
        let mut summaries = HashMap::new();

        for (environment, summary) in results
            .into_iter()
            .flatten()
            .filter_map(|(env, r)| r.ok().map(|s| (env, s)))
        {
            summaries.insert(environment, summary);
        }

        info!(
            "Multi-environment parallel execution completed in {}ms",
            start.elapsed().as_millis()
        );

        Ok(summaries)
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Batch runner for multiple parallel rounds
pub struct BatchRunner {
    executor: ParallelExecutor,
    rounds: u32,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize, rounds: u32) -> Self {
        Self {
            executor: ParallelExecutor::new(max_concurrent),
            rounds,
        }
    }

    /// Run multiple rounds of parallel scenarios
    pub async fn run_rounds(&self, target: &TargetConfig) -> Result<Vec<RoundSummary>> {
        info!(
            "Running {} rounds of parallel scenarios against {}",
            self.rounds, target.environment
        );

        let mut summaries = Vec::new();

        for round in 1..=self.rounds {
            info!("=== Round {}/{} ===", round, self.rounds);

            let results = self
                .executor
                .run_scenarios_parallel(target, Scenario::all())
                .await?;

            let mut sorted_results = results;
            sorted_results.sort_by_key(|r| r.scenario.number());

            let summary = RoundSummary::new(round, &target.environment, sorted_results);

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

    /// Aggregate results across multiple rounds
    pub fn aggregate_results(summaries: &[RoundSummary]) -> AggregateResult {
        let total_rounds = summaries.len() as u32;
        let mut scenario_stats: HashMap<Scenario, ScenarioStats> = HashMap::new();

        for summary in summaries {
            for result in &summary.results {
                let stats = scenario_stats.entry(result.scenario).or_default();

                match result.status {
                    ScenarioStatus::Pass => stats.passes += 1,
                    ScenarioStatus::Fail => stats.failures += 1,
                    ScenarioStatus::Skip => stats.skips += 1,
                    ScenarioStatus::Error => stats.errors += 1,
                }
                stats.total_duration_ms += result.duration_ms;
            }
        }

        // Calculate pass rates
        let scenario_pass_rates: HashMap<Scenario, f64> = scenario_stats
            .iter()
            .map(|(sc, stats)| {
                let total = stats.passes + stats.failures + stats.errors;
                let rate = if total > 0 {
                    (stats.passes as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                (*sc, rate)
            })
            .collect();

        let overall_pass_rate =
            summaries.iter().map(|s| s.pass_rate()).sum::<f64>() / summaries.len() as f64;

        AggregateResult {
            total_rounds,
            scenario_stats,
            scenario_pass_rates,
            overall_pass_rate,
        }
    }
}

/// Statistics for a single scenario across rounds
#[derive(Clone, Debug, Default)]
pub struct ScenarioStats {
    pub passes: u32,
    pub failures: u32,
    pub skips: u32,
    pub errors: u32,
    pub total_duration_ms: u64,
}

impl ScenarioStats {
    pub fn avg_duration_ms(&self) -> u64 {
        let total = self.passes + self.failures + self.errors;
        if total > 0 {
            self.total_duration_ms / total as u64
        } else {
            0
        }
    }
}

/// Aggregate results across multiple suite rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub scenario_stats: HashMap<Scenario, ScenarioStats>,
    pub scenario_pass_rates: HashMap<Scenario, f64>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    /// Get scenarios sorted by pass rate (lowest first)
    pub fn flaky_scenarios(&self) -> Vec<(Scenario, f64)> {
        let mut scenarios: Vec<_> = self
            .scenario_pass_rates
            .iter()
            .map(|(sc, rate)| (*sc, *rate))
            .collect();
        scenarios.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        scenarios
    }

    /// Get scenarios that always pass
    pub fn stable_scenarios(&self) -> Vec<Scenario> {
        self.scenario_pass_rates
            .iter()
            .filter(|(_, rate)| **rate >= 100.0)
            .map(|(sc, _)| *sc)
            .collect()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parallel_executor_creation() {
        let executor = ParallelExecutor::new(8).with_timeout(60);
        assert_eq!(executor.max_concurrent, 8);
        assert_eq!(executor.timeout_secs, 60);
    }

    #[test]
    fn test_batch_runner_creation() {
        let runner = BatchRunner::new(4, 10);
        assert_eq!(runner.rounds, 10);
    }

    #[test]
    fn test_aggregate_results() {
        let results1 = vec![
            ScenarioResult::pass(Scenario::UserRegistration, 100),
            ScenarioResult::fail(Scenario::UserLogin, 50, "token rejected"),
        ];
        let results2 = vec![
            ScenarioResult::pass(Scenario::UserRegistration, 120),
            ScenarioResult::pass(Scenario::UserLogin, 60),
        ];

        let summaries = vec![
            RoundSummary::new(1, "preview", results1),
            RoundSummary::new(2, "preview", results2),
        ];

        let aggregate = BatchRunner::aggregate_results(&summaries);
        assert_eq!(aggregate.total_rounds, 2);
        assert_eq!(
            aggregate.scenario_pass_rates.get(&Scenario::UserRegistration),
            Some(&100.0)
        );
        assert_eq!(
            aggregate.scenario_pass_rates.get(&Scenario::UserLogin),
            Some(&50.0)
        );
    }
}
