//! Bot behavior probe
//!
//! Polls the admin bot endpoint at a fixed interval and diffs consecutive
//! snapshots, watching the bot fleet honor its cycle accounting over time.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::snapshot::{BotSnapshot, SnapshotDiff};
use crate::api::{admin, auth};
use crate::http::ApiClient;
use crate::models::TargetConfig;
use crate::utils::Timer;

/// Probe configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Seconds between samples
    pub interval_secs: u64,

    /// Number of samples to take
    pub samples: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            samples: 6,
        }
    }
}

/// Outcome of a probe session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub environment: String,
    pub samples: Vec<BotSnapshot>,
    pub diffs: Vec<SnapshotDiff>,
    pub violations: Vec<String>,
    pub duration_ms: u64,
}

impl ProbeOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Total bet movement observed across the whole session
    pub fn total_activity(&self) -> u64 {
        self.diffs
            .iter()
            .map(|d| d.bets_opened + d.bets_settled)
            .sum()
    }
}

/// Probe runner
pub struct ProbeRunner {
    client: ApiClient,
    target: TargetConfig,
    config: ProbeConfig,
}

impl ProbeRunner {
    pub fn new(target: TargetConfig, config: ProbeConfig) -> Result<Self> {
        let client =
            ApiClient::with_timeout(&target.base_url, target.timeout_secs, target.verify_tls)?;
        Ok(Self {
            client,
            target,
            config,
        })
    }

    async fn take_snapshot(&self, token: &str) -> Result<BotSnapshot> {
        let resp = admin::bots(&self.client, token).await?;
        if !resp.is_success() {
            return Err(anyhow!(
                "bots endpoint answered {} during probe",
                resp.status_code
            ));
        }
        let body = resp.require_json()?;
        Ok(BotSnapshot::from_response(body))
    }

    /// Run the probe session
    pub async fn run(&self) -> Result<ProbeOutcome> {
        info!(
            "Probing {} every {}s for {} samples",
            self.target.environment, self.config.interval_secs, self.config.samples
        );

        let timer = Timer::start("probe");
        let admin = &self.target.admin;
        let session = auth::admin_session(&self.client, &admin.email, &admin.password).await?;

        let mut samples = Vec::new();
        let mut diffs = Vec::new();
        let mut violations = Vec::new();

        for sample in 1..=self.config.samples {
            let snapshot = self.take_snapshot(&session.token).await?;
            debug!(
                "Sample {}/{}: {} bots, {} active bets",
                sample,
                self.config.samples,
                snapshot.observations.len(),
                snapshot.total_active_bets()
            );

            if let Some(prev) = samples.last() {
                let diff = SnapshotDiff::between(prev, &snapshot);
                if !diff.violations.is_empty() {
                    for v in &diff.violations {
                        warn!("Cycle violation: {v}");
                        if !violations.contains(v) {
                            violations.push(v.clone());
                        }
                    }
                }
                diffs.push(diff);
            } else {
                // First-sample violations count too
                for v in snapshot.violations() {
                    warn!("Cycle violation: {v}");
                    violations.push(v);
                }
            }

            samples.push(snapshot);

            if sample < self.config.samples {
                sleep(Duration::from_secs(self.config.interval_secs)).await;
            }
        }

        let outcome = ProbeOutcome {
            environment: self.target.environment.clone(),
            samples,
            diffs,
            violations,
            duration_ms: timer.finish(),
        };

        info!(
            "Probe finished: {} samples, {} bet movements, {} violations",
            outcome.samples.len(),
            outcome.total_activity(),
            outcome.violations.len()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.samples, 6);
    }

    #[test]
    fn test_probe_runner_creation() {
        let target = TargetConfig::new("preview", "http://127.0.0.1:8001");
        let runner = ProbeRunner::new(target, ProbeConfig::default());
        assert!(runner.is_ok());
    }

    #[test]
    fn test_clean_outcome() {
        let outcome = ProbeOutcome {
            environment: "preview".to_string(),
            samples: Vec::new(),
            diffs: Vec::new(),
            violations: Vec::new(),
            duration_ms: 0,
        };
        assert!(outcome.is_clean());
        assert_eq!(outcome.total_activity(), 0);
    }
}
