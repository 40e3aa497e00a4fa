//! Bot administration scenarios
//!
//! Scenarios 12-14: Bot Limits, Cycle Compliance, Bot ROI Stats.
//! All three need admin credentials for the /api/admin endpoints.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{admin, auth};
use crate::http::ApiClient;
use crate::models::{Scenario, ScenarioResult};
use crate::scenarios::checks;

fn bot_name(bot: &Value) -> &str {
    bot.pointer("/name")
        .or_else(|| bot.pointer("/username"))
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
}

/// Scenario 12: active bot counts stay within the configured limits
#[derive(Clone, Debug)]
pub struct BotLimitsScenario {
    pub admin_email: String,
    pub admin_password: String,
}

impl BotLimitsScenario {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Bot Limits scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let session = auth::admin_session(client, &self.admin_email, &self.admin_password).await?;

        let limits = admin::bot_limits(client, &session.token).await?;
        let max_regular = limits.u64_field("/max_regular_bots");
        let max_human = limits.u64_field("/max_human_bots");
        match (max_regular, max_human) {
            (Some(r), Some(h)) => details.push(format!("✓ limits: {r} regular, {h} human-like")),
            _ => {
                all_passed = false;
                details.push(format!(
                    "✗ limits endpoint answered {} without both limits",
                    limits.status_code
                ));
            }
        }

        let bots = admin::bots(client, &session.token).await?;
        let active_regular = bots
            .array_field("/bots")
            .map(|bs| {
                bs.iter()
                    .filter(|b| b.pointer("/is_active").and_then(Value::as_bool) == Some(true))
                    .count() as u64
            })
            .ok_or_else(|| anyhow!("bots endpoint answered {} without a bots array", bots.status_code))?;

        let human_bots = admin::human_bots(client, &session.token).await?;
        let active_human = human_bots
            .array_field("/bots")
            .map(|bs| {
                bs.iter()
                    .filter(|b| b.pointer("/is_active").and_then(Value::as_bool) == Some(true))
                    .count() as u64
            })
            .ok_or_else(|| {
                anyhow!(
                    "human-bots endpoint answered {} without a bots array",
                    human_bots.status_code
                )
            })?;

        match max_regular {
            Some(limit) if active_regular <= limit => {
                details.push(format!("✓ {active_regular} active regular bots within limit {limit}"));
            }
            Some(limit) => {
                all_passed = false;
                details.push(format!("✗ {active_regular} active regular bots exceed limit {limit}"));
            }
            None => {}
        }

        match max_human {
            Some(limit) if active_human <= limit => {
                details.push(format!("✓ {active_human} active human-like bots within limit {limit}"));
            }
            Some(limit) => {
                all_passed = false;
                details.push(format!(
                    "✗ {active_human} active human-like bots exceed limit {limit}"
                ));
            }
            None => {}
        }

        Ok(ScenarioResult::from_checks(
            Scenario::BotLimits,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

/// Scenario 13: every bot honors its betting cycle accounting
#[derive(Clone, Debug)]
pub struct CycleComplianceScenario {
    pub admin_email: String,
    pub admin_password: String,
}

impl CycleComplianceScenario {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }

    fn check_bot(bot: &Value, details: &mut Vec<String>) -> bool {
        let name = bot_name(bot);
        let cycle_games = match bot.pointer("/cycle_games").and_then(Value::as_u64) {
            Some(n) if n > 0 => n,
            _ => {
                debug!("Bot {name} carries no cycle configuration, skipping");
                return true;
            }
        };

        let mut ok = true;

        let active_bets = bot
            .pointer("/active_bets_count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if active_bets <= cycle_games {
            details.push(format!("✓ {name}: {active_bets} active bets of {cycle_games} cycle games"));
        } else {
            ok = false;
            details.push(format!(
                "✗ {name}: {active_bets} active bets exceed {cycle_games} cycle games"
            ));
        }

        let min_bet = bot.pointer("/min_bet_amount").and_then(Value::as_f64);
        let max_bet = bot.pointer("/max_bet_amount").and_then(Value::as_f64);
        let reported = bot.pointer("/cycle_total_bet_amount").and_then(Value::as_f64);
        if let (Some(min), Some(max), Some(volume)) = (min_bet, max_bet, reported) {
            let expected = checks::cycle_bet_volume(min, max, cycle_games);
            if checks::money_eq(volume, expected) {
                details.push(format!("✓ {name}: cycle volume ${volume:.2}"));
            } else {
                ok = false;
                details.push(format!(
                    "✗ {name}: cycle volume ${volume:.2} expected ${expected:.2}"
                ));
            }
        }

        ok
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Cycle Compliance scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let session = auth::admin_session(client, &self.admin_email, &self.admin_password).await?;
        let resp = admin::bots(client, &session.token).await?;
        let bots = resp
            .array_field("/bots")
            .ok_or_else(|| anyhow!("bots endpoint answered {} without a bots array", resp.status_code))?;

        if bots.is_empty() {
            return Ok(ScenarioResult::skip(
                Scenario::CycleCompliance,
                "No bots configured on this environment",
            ));
        }

        details.push(format!("✓ inspecting {} bots", bots.len()));
        for bot in bots {
            all_passed &= Self::check_bot(bot, &mut details);
        }

        Ok(ScenarioResult::from_checks(
            Scenario::CycleCompliance,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

/// Scenario 14: reported ROI matches the wins/losses it is derived from
#[derive(Clone, Debug)]
pub struct BotRoiScenario {
    pub admin_email: String,
    pub admin_password: String,
}

impl BotRoiScenario {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }

    fn check_bot(bot: &Value, details: &mut Vec<String>) -> Option<bool> {
        let name = bot_name(bot);
        let wins = bot.pointer("/total_wins_amount").and_then(Value::as_f64)?;
        let losses = bot.pointer("/total_losses_amount").and_then(Value::as_f64)?;
        let reported = bot.pointer("/roi_active").and_then(Value::as_f64)?;

        let expected = checks::roi_active(wins, losses)?;
        if (reported - expected).abs() < 0.01 {
            details.push(format!("✓ {name}: ROI {reported:.2}%"));
            Some(true)
        } else {
            details.push(format!(
                "✗ {name}: ROI {reported:.2}% expected {expected:.2}% from ${wins:.2} won / ${losses:.2} lost"
            ));
            Some(false)
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Bot ROI Stats scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let session = auth::admin_session(client, &self.admin_email, &self.admin_password).await?;
        let resp = admin::bots(client, &session.token).await?;
        let bots = resp
            .array_field("/bots")
            .ok_or_else(|| anyhow!("bots endpoint answered {} without a bots array", resp.status_code))?;

        let mut checked = 0usize;
        for bot in bots {
            if let Some(ok) = Self::check_bot(bot, &mut details) {
                checked += 1;
                all_passed &= ok;
            }
        }

        if checked == 0 {
            return Ok(ScenarioResult::skip(
                Scenario::BotRoiStats,
                "No bot has betting volume to derive ROI from",
            ));
        }
        details.push(format!("✓ verified ROI on {checked} bots"));

        Ok(ScenarioResult::from_checks(
            Scenario::BotRoiStats,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cycle_check_flags_overrun() {
        let bot = json!({
            "name": "bot-7",
            "cycle_games": 12,
            "active_bets_count": 15,
            "min_bet_amount": 1.0,
            "max_bet_amount": 50.0,
            "cycle_total_bet_amount": 306.0
        });
        let mut details = Vec::new();
        assert!(!CycleComplianceScenario::check_bot(&bot, &mut details));
        assert!(details.iter().any(|d| d.starts_with('✗')));
    }

    #[test]
    fn test_cycle_check_accepts_compliant_bot() {
        let bot = json!({
            "name": "bot-3",
            "cycle_games": 12,
            "active_bets_count": 4,
            "min_bet_amount": 1.0,
            "max_bet_amount": 50.0,
            "cycle_total_bet_amount": 306.0
        });
        let mut details = Vec::new();
        assert!(CycleComplianceScenario::check_bot(&bot, &mut details));
    }

    #[test]
    fn test_roi_check_skips_idle_bot() {
        let bot = json!({
            "name": "bot-1",
            "total_wins_amount": 0.0,
            "total_losses_amount": 0.0,
            "roi_active": 0.0
        });
        let mut details = Vec::new();
        assert!(BotRoiScenario::check_bot(&bot, &mut details).is_none());
    }

    #[test]
    fn test_roi_check_matches_formula() {
        let bot = json!({
            "name": "bot-2",
            "total_wins_amount": 150.0,
            "total_losses_amount": 50.0,
            "roi_active": 50.0
        });
        let mut details = Vec::new();
        assert_eq!(BotRoiScenario::check_bot(&bot, &mut details), Some(true));
    }
}
