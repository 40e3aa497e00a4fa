//! Environment comparison functionality
//!
//! Compare suite results across GemPlay deployments, e.g. preview against
//! staging before a promotion.

use std::collections::BTreeMap;

use crate::results::storage::{StoredRun, StoredScenarioStats};

/// Comparison result between environments
#[derive(Clone, Debug)]
pub struct EnvironmentComparison {
    /// Environment names being compared
    pub environments: Vec<String>,

    /// Per-scenario comparison
    pub scenario_comparisons: Vec<ScenarioComparison>,

    /// Overall rankings
    pub rankings: EnvironmentRankings,

    /// Summary statistics
    pub summary: ComparisonSummary,
}

/// Comparison for a single scenario across environments
#[derive(Clone, Debug)]
pub struct ScenarioComparison {
    /// Scenario name
    pub scenario_name: String,

    /// Scenario category
    pub category: String,

    /// Results per environment (environment name -> stats)
    pub environment_results: BTreeMap<String, ScenarioComparisonResult>,

    /// Best performing environment
    pub best_environment: Option<String>,

    /// Winner criteria
    pub winner_criteria: WinnerCriteria,
}

/// Result for a single environment in a scenario comparison
#[derive(Clone, Debug)]
pub struct ScenarioComparisonResult {
    /// Pass rate (0.0 - 1.0)
    pub pass_rate: f64,

    /// Average duration in ms
    pub avg_duration_ms: u64,

    /// Pass count
    pub pass_count: u32,

    /// Fail count
    pub fail_count: u32,

    /// Relative performance score (higher is better)
    pub score: f64,
}

/// Criteria for determining the winner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinnerCriteria {
    /// Winner determined by pass rate
    PassRate,
    /// Winner determined by duration
    Duration,
    /// All environments had same result
    Tie,
    /// No data available
    NoData,
}

/// Overall environment rankings
#[derive(Clone, Debug)]
pub struct EnvironmentRankings {
    /// Ranking by overall pass rate
    pub by_pass_rate: Vec<RankedEnvironment>,

    /// Ranking by average duration
    pub by_duration: Vec<RankedEnvironment>,

    /// Ranking by combined score
    pub by_score: Vec<RankedEnvironment>,

    /// Number of scenarios won per environment
    pub wins: BTreeMap<String, u32>,
}

/// An environment with its rank
#[derive(Clone, Debug)]
pub struct RankedEnvironment {
    /// Rank (1 = best)
    pub rank: u32,

    /// Environment name
    pub environment: String,

    /// Value for this ranking
    pub value: f64,
}

/// Summary of comparison
#[derive(Clone, Debug)]
pub struct ComparisonSummary {
    /// Number of environments compared
    pub environment_count: usize,

    /// Number of scenarios compared
    pub scenario_count: usize,

    /// Best overall environment (by combined score)
    pub best_overall: Option<String>,

    /// Most reliable environment (highest pass rate)
    pub most_reliable: Option<String>,

    /// Fastest environment (lowest avg duration)
    pub fastest: Option<String>,

    /// Scenarios where all environments passed
    pub universal_pass: usize,

    /// Scenarios where all environments failed
    pub universal_fail: usize,

    /// Scenarios with mixed results
    pub mixed_results: usize,
}

/// Environment comparator
pub struct EnvironmentComparator;

impl EnvironmentComparator {
    /// Compare multiple environment suite runs
    pub fn compare(runs: &[StoredRun]) -> EnvironmentComparison {
        if runs.is_empty() {
            return EnvironmentComparison::empty();
        }

        let environments: Vec<String> = runs.iter().map(|r| r.environment.clone()).collect();

        // Build per-scenario comparisons
        let scenario_comparisons = Self::build_scenario_comparisons(runs);

        // Calculate rankings
        let rankings = Self::calculate_rankings(runs, &scenario_comparisons);

        // Build summary
        let summary = Self::build_summary(&environments, &scenario_comparisons, &rankings);

        EnvironmentComparison {
            environments,
            scenario_comparisons,
            rankings,
            summary,
        }
    }

    fn build_scenario_comparisons(runs: &[StoredRun]) -> Vec<ScenarioComparison> {
        // Collect all scenario names
        let mut all_scenarios: BTreeMap<String, String> = BTreeMap::new(); // name -> category
        for run in runs {
            if let Some(agg) = &run.aggregate {
                for name in agg.scenario_stats.keys() {
                    if !all_scenarios.contains_key(name) {
                        // Try to find category from results
                        let category = run
                            .summaries
                            .first()
                            .and_then(|s| s.results.iter().find(|r| &r.scenario_name == name))
                            .map(|r| r.category.clone())
                            .unwrap_or_else(|| "Unknown".to_string());
                        all_scenarios.insert(name.clone(), category);
                    }
                }
            }
        }

        // Build comparisons for each scenario
        all_scenarios
            .into_iter()
            .map(|(scenario_name, category)| {
                let mut environment_results: BTreeMap<String, ScenarioComparisonResult> =
                    BTreeMap::new();

                for run in runs {
                    if let Some(agg) = &run.aggregate {
                        if let Some(stats) = agg.scenario_stats.get(&scenario_name) {
                            let result = ScenarioComparisonResult::from_stats(stats);
                            environment_results.insert(run.environment.clone(), result);
                        }
                    }
                }

                // Determine winner
                let (best_environment, winner_criteria) =
                    Self::determine_winner(&environment_results);

                ScenarioComparison {
                    scenario_name,
                    category,
                    environment_results,
                    best_environment,
                    winner_criteria,
                }
            })
            .collect()
    }

    fn determine_winner(
        results: &BTreeMap<String, ScenarioComparisonResult>,
    ) -> (Option<String>, WinnerCriteria) {
        if results.is_empty() {
            return (None, WinnerCriteria::NoData);
        }

        // First, compare by pass rate
        let max_pass_rate = results.values().map(|r| r.pass_rate).fold(0.0, f64::max);
        let min_pass_rate = results.values().map(|r| r.pass_rate).fold(1.0, f64::min);

        if (max_pass_rate - min_pass_rate).abs() > 0.01 {
            // Significant difference in pass rate
            let winner = results
                .iter()
                .max_by(|a, b| a.1.pass_rate.partial_cmp(&b.1.pass_rate).unwrap())
                .map(|(k, _)| k.clone());
            return (winner, WinnerCriteria::PassRate);
        }

        // All have same pass rate, compare by duration
        let min_duration = results
            .values()
            .map(|r| r.avg_duration_ms)
            .min()
            .unwrap_or(0);
        let max_duration = results
            .values()
            .map(|r| r.avg_duration_ms)
            .max()
            .unwrap_or(0);

        if max_duration > 0 && min_duration < max_duration {
            let winner = results
                .iter()
                .min_by_key(|(_, v)| v.avg_duration_ms)
                .map(|(k, _)| k.clone());
            return (winner, WinnerCriteria::Duration);
        }

        // It's a tie
        (None, WinnerCriteria::Tie)
    }

    fn calculate_rankings(
        runs: &[StoredRun],
        comparisons: &[ScenarioComparison],
    ) -> EnvironmentRankings {
        // Calculate wins per environment
        let mut wins: BTreeMap<String, u32> = BTreeMap::new();
        for comp in comparisons {
            if let Some(winner) = &comp.best_environment {
                *wins.entry(winner.clone()).or_insert(0) += 1;
            }
        }

        // Ranking by pass rate
        let mut by_pass_rate: Vec<RankedEnvironment> = runs
            .iter()
            .filter_map(|r| {
                r.aggregate.as_ref().map(|a| RankedEnvironment {
                    rank: 0,
                    environment: r.environment.clone(),
                    value: a.avg_pass_rate,
                })
            })
            .collect();
        by_pass_rate.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap());
        for (i, r) in by_pass_rate.iter_mut().enumerate() {
            r.rank = i as u32 + 1;
        }

        // Ranking by duration (lower is better)
        let mut by_duration: Vec<RankedEnvironment> = runs
            .iter()
            .filter_map(|r| {
                r.aggregate.as_ref().map(|a| RankedEnvironment {
                    rank: 0,
                    environment: r.environment.clone(),
                    value: a.avg_duration_ms as f64,
                })
            })
            .collect();
        by_duration.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
        for (i, r) in by_duration.iter_mut().enumerate() {
            r.rank = i as u32 + 1;
        }

        // Combined score ranking
        let mut by_score: Vec<RankedEnvironment> = runs
            .iter()
            .filter_map(|r| {
                r.aggregate.as_ref().map(|a| {
                    // Score = pass_rate * 100 - log(duration)
                    let duration_factor = (a.avg_duration_ms as f64).ln();
                    let score = a.avg_pass_rate * 100.0 - duration_factor;
                    RankedEnvironment {
                        rank: 0,
                        environment: r.environment.clone(),
                        value: score,
                    }
                })
            })
            .collect();
        by_score.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap());
        for (i, r) in by_score.iter_mut().enumerate() {
            r.rank = i as u32 + 1;
        }

        EnvironmentRankings {
            by_pass_rate,
            by_duration,
            by_score,
            wins,
        }
    }

    fn build_summary(
        environments: &[String],
        comparisons: &[ScenarioComparison],
        rankings: &EnvironmentRankings,
    ) -> ComparisonSummary {
        let mut universal_pass = 0;
        let mut universal_fail = 0;
        let mut mixed_results = 0;

        for comp in comparisons {
            if comp.environment_results.is_empty() {
                continue;
            }

            let all_pass = comp
                .environment_results
                .values()
                .all(|r| r.pass_rate >= 0.99);
            let all_fail = comp
                .environment_results
                .values()
                .all(|r| r.pass_rate <= 0.01);

            if all_pass {
                universal_pass += 1;
            } else if all_fail {
                universal_fail += 1;
            } else {
                mixed_results += 1;
            }
        }

        ComparisonSummary {
            environment_count: environments.len(),
            scenario_count: comparisons.len(),
            best_overall: rankings.by_score.first().map(|r| r.environment.clone()),
            most_reliable: rankings.by_pass_rate.first().map(|r| r.environment.clone()),
            fastest: rankings.by_duration.first().map(|r| r.environment.clone()),
            universal_pass,
            universal_fail,
            mixed_results,
        }
    }
}

impl ScenarioComparisonResult {
    fn from_stats(stats: &StoredScenarioStats) -> Self {
        // Score = pass_rate * 100 - normalized duration
        let duration_score = if stats.avg_duration_ms > 0 {
            (stats.avg_duration_ms as f64).ln() * 5.0
        } else {
            0.0
        };
        let score = stats.pass_rate * 100.0 - duration_score;

        Self {
            pass_rate: stats.pass_rate,
            avg_duration_ms: stats.avg_duration_ms,
            pass_count: stats.pass_count,
            fail_count: stats.fail_count,
            score,
        }
    }
}

impl EnvironmentComparison {
    fn empty() -> Self {
        Self {
            environments: Vec::new(),
            scenario_comparisons: Vec::new(),
            rankings: EnvironmentRankings {
                by_pass_rate: Vec::new(),
                by_duration: Vec::new(),
                by_score: Vec::new(),
                wins: BTreeMap::new(),
            },
            summary: ComparisonSummary {
                environment_count: 0,
                scenario_count: 0,
                best_overall: None,
                most_reliable: None,
                fastest: None,
                universal_pass: 0,
                universal_fail: 0,
                mixed_results: 0,
            },
        }
    }
}

/// Comparison report formatter
pub struct ComparisonFormatter;

impl ComparisonFormatter {
    /// Format comparison as table
    pub fn format_table(comparison: &EnvironmentComparison) -> String {
        let mut output = String::new();

        // Header
        output
            .push_str("\n╔════════════════════════════════════════════════════════════════════╗\n");
        output
            .push_str("║                  GemPlay Environment Comparison Report              ║\n");
        output.push_str("╠════════════════════════════════════════════════════════════════════╣\n");

        // Summary
        output.push_str(&format!(
            "║ Environments: {:2}  │  Scenarios: {:2}  │  Best Overall: {:14} ║\n",
            comparison.summary.environment_count,
            comparison.summary.scenario_count,
            comparison.summary.best_overall.as_deref().unwrap_or("N/A")
        ));

        output.push_str("╠════════════════════════════════════════════════════════════════════╣\n");

        // Rankings
        output.push_str("║ Rankings:                                                          ║\n");
        output.push_str("╟────────────────────────────────────────────────────────────────────╢\n");

        output.push_str("║  By Pass Rate:                                                     ║\n");
        for rank in &comparison.rankings.by_pass_rate {
            output.push_str(&format!(
                "║    #{} {:30} {:.1}%                   ║\n",
                rank.rank,
                rank.environment,
                rank.value * 100.0
            ));
        }

        output.push_str("╟────────────────────────────────────────────────────────────────────╢\n");
        output.push_str("║  By Duration (fastest):                                            ║\n");
        for rank in &comparison.rankings.by_duration {
            output.push_str(&format!(
                "║    #{} {:30} {:>6.0}ms                  ║\n",
                rank.rank, rank.environment, rank.value
            ));
        }

        output.push_str("╟────────────────────────────────────────────────────────────────────╢\n");
        output.push_str("║  Scenario Wins:                                                    ║\n");
        for (environment, wins) in &comparison.rankings.wins {
            output.push_str(&format!(
                "║    {environment:30} {wins:>3} wins                      ║\n"
            ));
        }

        output.push_str("╠════════════════════════════════════════════════════════════════════╣\n");

        // Scenario details (abbreviated)
        output.push_str("║ Scenario Results:                                                  ║\n");
        output.push_str(&format!(
            "║   Universal Pass: {:2}  │  Universal Fail: {:2}  │  Mixed: {:2}         ║\n",
            comparison.summary.universal_pass,
            comparison.summary.universal_fail,
            comparison.summary.mixed_results
        ));

        output.push_str("╚════════════════════════════════════════════════════════════════════╝\n");

        output
    }

    /// Format comparison as JSON
    pub fn format_json(comparison: &EnvironmentComparison) -> String {
        serde_json::to_string_pretty(&ComparisonJson::from(comparison)).unwrap_or_default()
    }
}

/// JSON-serializable comparison
#[derive(serde::Serialize)]
struct ComparisonJson {
    environments: Vec<String>,
    summary: ComparisonSummaryJson,
    rankings: RankingsJson,
}

#[derive(serde::Serialize)]
struct ComparisonSummaryJson {
    environment_count: usize,
    scenario_count: usize,
    best_overall: Option<String>,
    most_reliable: Option<String>,
    fastest: Option<String>,
}

#[derive(serde::Serialize)]
struct RankingsJson {
    by_pass_rate: Vec<RankEntryJson>,
    by_duration: Vec<RankEntryJson>,
    wins: BTreeMap<String, u32>,
}

#[derive(serde::Serialize)]
struct RankEntryJson {
    rank: u32,
    environment: String,
    value: f64,
}

impl From<&EnvironmentComparison> for ComparisonJson {
    fn from(c: &EnvironmentComparison) -> Self {
        Self {
            environments: c.environments.clone(),
            summary: ComparisonSummaryJson {
                environment_count: c.summary.environment_count,
                scenario_count: c.summary.scenario_count,
                best_overall: c.summary.best_overall.clone(),
                most_reliable: c.summary.most_reliable.clone(),
                fastest: c.summary.fastest.clone(),
            },
            rankings: RankingsJson {
                by_pass_rate: c
                    .rankings
                    .by_pass_rate
                    .iter()
                    .map(|r| RankEntryJson {
                        rank: r.rank,
                        environment: r.environment.clone(),
                        value: r.value,
                    })
                    .collect(),
                by_duration: c
                    .rankings
                    .by_duration
                    .iter()
                    .map(|r| RankEntryJson {
                        rank: r.rank,
                        environment: r.environment.clone(),
                        value: r.value,
                    })
                    .collect(),
                wins: c.rankings.wins.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_comparison() {
        let comparison = EnvironmentComparator::compare(&[]);
        assert_eq!(comparison.environments.len(), 0);
        assert_eq!(comparison.summary.environment_count, 0);
    }

    #[test]
    fn test_winner_criteria() {
        let mut results = BTreeMap::new();
        results.insert(
            "preview".to_string(),
            ScenarioComparisonResult {
                pass_rate: 1.0,
                avg_duration_ms: 100,
                pass_count: 10,
                fail_count: 0,
                score: 95.0,
            },
        );
        results.insert(
            "staging".to_string(),
            ScenarioComparisonResult {
                pass_rate: 0.8,
                avg_duration_ms: 50,
                pass_count: 8,
                fail_count: 2,
                score: 85.0,
            },
        );

        let (winner, criteria) = EnvironmentComparator::determine_winner(&results);
        assert_eq!(winner, Some("preview".to_string()));
        assert_eq!(criteria, WinnerCriteria::PassRate);
    }

    #[test]
    fn test_duration_breaks_pass_rate_tie() {
        let mut results = BTreeMap::new();
        results.insert(
            "preview".to_string(),
            ScenarioComparisonResult {
                pass_rate: 1.0,
                avg_duration_ms: 200,
                pass_count: 10,
                fail_count: 0,
                score: 90.0,
            },
        );
        results.insert(
            "staging".to_string(),
            ScenarioComparisonResult {
                pass_rate: 1.0,
                avg_duration_ms: 80,
                pass_count: 10,
                fail_count: 0,
                score: 95.0,
            },
        );

        let (winner, criteria) = EnvironmentComparator::determine_winner(&results);
        assert_eq!(winner, Some("staging".to_string()));
        assert_eq!(criteria, WinnerCriteria::Duration);
    }
}
