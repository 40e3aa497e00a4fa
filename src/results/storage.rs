//! Results storage and retrieval
//!
//! Provides persistent storage for suite runs in JSON format, keyed by
//! environment.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{RoundSummary, ScenarioResult, ScenarioStatus};

/// Stored suite run containing all results
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    /// Unique run ID
    pub id: String,

    /// Environment name
    pub environment: String,

    /// API base URL
    pub base_url: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Number of rounds
    pub rounds: u32,

    /// Round summaries
    pub summaries: Vec<StoredRoundSummary>,

    /// Aggregate statistics
    pub aggregate: Option<AggregateStats>,

    /// Suite configuration
    pub config: RunConfig,

    /// Environment info
    pub host: HostInfo,
}

/// Stored round summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRoundSummary {
    /// Round number
    pub round: u32,

    /// Total scenarios run
    pub total: usize,

    /// Scenarios passed
    pub passed: usize,

    /// Scenarios failed
    pub failed: usize,

    /// Scenarios skipped
    pub skipped: usize,

    /// Pass rate (0.0 - 1.0)
    pub pass_rate: f64,

    /// Total duration in milliseconds
    pub duration_ms: u64,

    /// Individual scenario results
    pub results: Vec<StoredScenarioResult>,
}

/// Stored scenario result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredScenarioResult {
    /// Scenario number
    pub scenario_number: u8,

    /// Scenario name
    pub scenario_name: String,

    /// Scenario category
    pub category: String,

    /// Whether the scenario passed
    pub passed: bool,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Check details or error message
    pub message: Option<String>,
}

/// Aggregate statistics across all rounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Average pass rate
    pub avg_pass_rate: f64,

    /// Minimum pass rate
    pub min_pass_rate: f64,

    /// Maximum pass rate
    pub max_pass_rate: f64,

    /// Average duration per round
    pub avg_duration_ms: u64,

    /// Total duration
    pub total_duration_ms: u64,

    /// Per-scenario statistics
    pub scenario_stats: BTreeMap<String, StoredScenarioStats>,
}

/// Statistics for a single scenario across rounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredScenarioStats {
    /// Number of times passed
    pub pass_count: u32,

    /// Number of times failed
    pub fail_count: u32,

    /// Pass rate
    pub pass_rate: f64,

    /// Average duration
    pub avg_duration_ms: u64,

    /// Min duration
    pub min_duration_ms: u64,

    /// Max duration
    pub max_duration_ms: u64,
}

/// Suite run configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Whether scenarios ran in parallel
    pub parallel: bool,

    /// Concurrency level
    pub concurrency: usize,

    /// Skipped scenario numbers
    pub skipped_scenarios: Vec<u8>,
}

/// Information about the host the suite ran from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            parallel: false,
            concurrency: 4,
            skipped_scenarios: Vec::new(),
        }
    }
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredRun {
    /// Create a new stored run
    pub fn new(environment: &str, base_url: &str) -> Self {
        Self {
            id: generate_run_id(),
            environment: environment.to_string(),
            base_url: base_url.to_string(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            rounds: 0,
            summaries: Vec::new(),
            aggregate: None,
            config: RunConfig::default(),
            host: HostInfo::default(),
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a round summary
    pub fn add_round(&mut self, round: u32, summary: &RoundSummary) {
        let stored = StoredRoundSummary::from_round_summary(round, summary);
        self.summaries.push(stored);
        self.rounds = round;
        self.completed_at = Utc::now();
    }

    /// Calculate aggregate statistics
    pub fn calculate_aggregate(&mut self) {
        if self.summaries.is_empty() {
            return;
        }

        let mut pass_rates: Vec<f64> = Vec::new();
        let mut durations: Vec<u64> = Vec::new();
        let mut scenario_results: BTreeMap<String, Vec<(bool, u64)>> = BTreeMap::new();

        for summary in &self.summaries {
            pass_rates.push(summary.pass_rate);
            durations.push(summary.duration_ms);

            for result in &summary.results {
                scenario_results
                    .entry(result.scenario_name.clone())
                    .or_default()
                    .push((result.passed, result.duration_ms));
            }
        }

        let avg_pass_rate = pass_rates.iter().sum::<f64>() / pass_rates.len() as f64;
        let min_pass_rate = pass_rates.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_pass_rate = pass_rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let total_duration_ms: u64 = durations.iter().sum();
        let avg_duration_ms = total_duration_ms / durations.len() as u64;

        let mut scenario_stats: BTreeMap<String, StoredScenarioStats> = BTreeMap::new();
        for (name, results) in scenario_results {
            let pass_count = results.iter().filter(|(p, _)| *p).count() as u32;
            let fail_count = results.len() as u32 - pass_count;
            let pass_rate = pass_count as f64 / results.len() as f64;

            let durs: Vec<u64> = results.iter().map(|(_, d)| *d).collect();
            let avg_dur = durs.iter().sum::<u64>() / durs.len() as u64;
            let min_dur = *durs.iter().min().unwrap_or(&0);
            let max_dur = *durs.iter().max().unwrap_or(&0);

            scenario_stats.insert(
                name,
                StoredScenarioStats {
                    pass_count,
                    fail_count,
                    pass_rate,
                    avg_duration_ms: avg_dur,
                    min_duration_ms: min_dur,
                    max_duration_ms: max_dur,
                },
            );
        }

        self.aggregate = Some(AggregateStats {
            avg_pass_rate,
            min_pass_rate,
            max_pass_rate,
            avg_duration_ms,
            total_duration_ms,
            scenario_stats,
        });
    }
}

impl StoredRoundSummary {
    /// Convert from RoundSummary
    pub fn from_round_summary(round: u32, summary: &RoundSummary) -> Self {
        let results: Vec<StoredScenarioResult> = summary
            .results
            .iter()
            .map(StoredScenarioResult::from_scenario_result)
            .collect();

        let pass_rate = if summary.total > 0 {
            summary.passed as f64 / summary.total as f64
        } else {
            0.0
        };

        Self {
            round,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            pass_rate,
            duration_ms: summary.total_duration_ms,
            results,
        }
    }
}

impl StoredScenarioResult {
    /// Convert from ScenarioResult
    pub fn from_scenario_result(result: &ScenarioResult) -> Self {
        Self {
            scenario_number: result.scenario.number(),
            scenario_name: result.scenario.name().to_string(),
            category: result.scenario.category().to_string(),
            passed: result.status == ScenarioStatus::Pass,
            duration_ms: result.duration_ms,
            message: result.message.clone(),
        }
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Results storage manager
pub struct ResultsStorage {
    /// Base directory for results
    base_dir: PathBuf,
}

impl ResultsStorage {
    /// Create a new results storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create with default directory
    pub fn default_dir() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gemplay-qa")
            .join("results");
        Ok(Self::new(base_dir))
    }

    /// Ensure storage directory exists
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    /// Get path for an environment's results
    fn environment_dir(&self, environment: &str) -> PathBuf {
        self.base_dir.join(environment.to_lowercase())
    }

    /// Get path for a specific run
    fn run_path(&self, environment: &str, run_id: &str) -> PathBuf {
        self.environment_dir(environment)
            .join(format!("{run_id}.json"))
    }

    /// Save a suite run
    pub fn save(&self, run: &StoredRun) -> Result<PathBuf> {
        let env_dir = self.environment_dir(&run.environment);
        fs::create_dir_all(&env_dir)?;

        let path = self.run_path(&run.environment, &run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, run).context("Failed to write results")?;

        info!("Saved suite results to {}", path.display());
        Ok(path)
    }

    /// Load a suite run
    pub fn load(&self, environment: &str, run_id: &str) -> Result<StoredRun> {
        let path = self.run_path(environment, run_id);
        let file = File::open(&path).context("Failed to open results file")?;
        let reader = BufReader::new(file);

        let run: StoredRun = serde_json::from_reader(reader).context("Failed to parse results")?;

        debug!("Loaded suite results from {}", path.display());
        Ok(run)
    }

    /// Load all runs for an environment
    pub fn load_environment(&self, environment: &str) -> Result<Vec<StoredRun>> {
        let env_dir = self.environment_dir(environment);
        if !env_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&env_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        debug!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Sort by timestamp
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    /// Load from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<StoredRun> {
        let file = File::open(path).context("Failed to open results file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("Failed to parse results")
    }

    /// List all environments with results
    pub fn list_environments(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut environments = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    environments.push(name.to_string());
                }
            }
        }

        environments.sort();
        Ok(environments)
    }

    /// List all runs for an environment
    pub fn list_runs(&self, environment: &str) -> Result<Vec<RunInfo>> {
        let env_dir = self.environment_dir(environment);
        if !env_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&env_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Ok(run) = self.load_from_path(&path) {
                    runs.push(RunInfo {
                        id: run.id,
                        environment: run.environment,
                        started_at: run.started_at,
                        rounds: run.rounds,
                        pass_rate: run
                            .aggregate
                            .as_ref()
                            .map(|a| a.avg_pass_rate)
                            .unwrap_or(0.0),
                    });
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    /// Get latest run for an environment
    pub fn latest(&self, environment: &str) -> Result<Option<StoredRun>> {
        let runs = self.load_environment(environment)?;
        Ok(runs.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, environment: &str, run_id: &str) -> Result<()> {
        let path = self.run_path(environment, run_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted results: {}", path.display());
        }
        Ok(())
    }

    /// Delete all runs for an environment
    pub fn delete_environment(&self, environment: &str) -> Result<()> {
        let env_dir = self.environment_dir(environment);
        if env_dir.exists() {
            fs::remove_dir_all(&env_dir)?;
            info!("Deleted all results for environment: {environment}");
        }
        Ok(())
    }

    /// Export run to a file
    pub fn export(&self, run: &StoredRun, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Json => {
                let file = File::create(path)?;
                let writer = BufWriter::new(file);
                serde_json::to_writer_pretty(writer, run)?;
            }
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;

                // Write header
                writer.write_record([
                    "round",
                    "scenario_number",
                    "scenario_name",
                    "category",
                    "passed",
                    "duration_ms",
                    "message",
                ])?;

                // Write results
                for summary in &run.summaries {
                    for result in &summary.results {
                        writer.write_record([
                            summary.round.to_string(),
                            result.scenario_number.to_string(),
                            result.scenario_name.clone(),
                            result.category.clone(),
                            result.passed.to_string(),
                            result.duration_ms.to_string(),
                            result.message.clone().unwrap_or_default(),
                        ])?;
                    }
                }
                writer.flush()?;
            }
        }

        info!("Exported results to {}", path.display());
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub environment: String,
    pub started_at: DateTime<Utc>,
    pub rounds: u32,
    pub pass_rate: f64,
}

/// Export format
#[derive(Clone, Copy, Debug)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scenario;
    use tempfile::TempDir;

    #[test]
    fn test_stored_run() {
        let run = StoredRun::new("preview", "https://preview.gemplay.app");
        assert_eq!(run.environment, "preview");
        assert_eq!(run.rounds, 0);
        assert!(!run.id.is_empty());
    }

    #[test]
    fn test_export_format() {
        assert!(matches!(
            ExportFormat::from_str("json"),
            Some(ExportFormat::Json)
        ));
        assert!(matches!(
            ExportFormat::from_str("csv"),
            Some(ExportFormat::Csv)
        ));
        assert!(ExportFormat::from_str("unknown").is_none());
    }

    #[test]
    fn test_host_info() {
        let host = HostInfo::default();
        assert!(!host.os.is_empty());
        assert_eq!(host.tool_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = ResultsStorage::new(dir.path());

        let mut run = StoredRun::new("preview", "http://127.0.0.1:8001");
        let summary = RoundSummary::new(
            1,
            "preview",
            vec![
                ScenarioResult::pass(Scenario::UserRegistration, 120),
                ScenarioResult::fail(Scenario::GemSale, 80, "oversell accepted"),
            ],
        );
        run.add_round(1, &summary);
        run.calculate_aggregate();

        storage.save(&run).unwrap();

        let loaded = storage.load("preview", &run.id).unwrap();
        assert_eq!(loaded.rounds, 1);
        assert_eq!(loaded.summaries[0].passed, 1);
        assert_eq!(loaded.summaries[0].failed, 1);
        assert!(loaded.aggregate.is_some());

        let environments = storage.list_environments().unwrap();
        assert_eq!(environments, vec!["preview"]);
    }
}
