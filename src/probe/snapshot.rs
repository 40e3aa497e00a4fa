//! Bot state snapshots
//!
//! A snapshot captures every bot's betting state at one point in time.
//! Diffing consecutive snapshots shows cycle progress and surfaces
//! violations while the system is live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scenarios::checks;

/// One bot's state as reported by the admin API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotObservation {
    pub name: String,
    pub is_active: bool,
    pub active_bets: u64,
    pub cycle_games: Option<u64>,
    pub min_bet_amount: Option<f64>,
    pub max_bet_amount: Option<f64>,
    pub cycle_total_bet_amount: Option<f64>,
    pub completed_games: Option<u64>,
}

impl BotObservation {
    pub fn from_json(bot: &Value) -> Option<Self> {
        let name = bot
            .pointer("/name")
            .or_else(|| bot.pointer("/username"))
            .and_then(Value::as_str)?
            .to_string();

        Some(Self {
            name,
            is_active: bot
                .pointer("/is_active")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            active_bets: bot
                .pointer("/active_bets_count")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            cycle_games: bot.pointer("/cycle_games").and_then(Value::as_u64),
            min_bet_amount: bot.pointer("/min_bet_amount").and_then(Value::as_f64),
            max_bet_amount: bot.pointer("/max_bet_amount").and_then(Value::as_f64),
            cycle_total_bet_amount: bot
                .pointer("/cycle_total_bet_amount")
                .and_then(Value::as_f64),
            completed_games: bot.pointer("/completed_games").and_then(Value::as_u64),
        })
    }

    /// Check this observation against the bot's cycle configuration
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if let Some(cycle_games) = self.cycle_games {
            if cycle_games > 0 && self.active_bets > cycle_games {
                violations.push(format!(
                    "{}: {} active bets exceed {} cycle games",
                    self.name, self.active_bets, cycle_games
                ));
            }

            if let (Some(min), Some(max), Some(volume)) = (
                self.min_bet_amount,
                self.max_bet_amount,
                self.cycle_total_bet_amount,
            ) {
                let expected = checks::cycle_bet_volume(min, max, cycle_games);
                if !checks::money_eq(volume, expected) {
                    violations.push(format!(
                        "{}: cycle volume ${volume:.2} expected ${expected:.2}",
                        self.name
                    ));
                }
            }
        }

        violations
    }
}

/// All bots at one point in time
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotSnapshot {
    pub taken_at: DateTime<Utc>,
    pub observations: Vec<BotObservation>,
}

impl BotSnapshot {
    pub fn from_response(body: &Value) -> Self {
        let observations = body
            .pointer("/bots")
            .and_then(Value::as_array)
            .map(|bots| bots.iter().filter_map(BotObservation::from_json).collect())
            .unwrap_or_default();

        Self {
            taken_at: Utc::now(),
            observations,
        }
    }

    pub fn active_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_active).count()
    }

    pub fn total_active_bets(&self) -> u64 {
        self.observations.iter().map(|o| o.active_bets).sum()
    }

    /// Violations across every bot in this snapshot
    pub fn violations(&self) -> Vec<String> {
        self.observations
            .iter()
            .flat_map(|o| o.violations())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&BotObservation> {
        self.observations.iter().find(|o| o.name == name)
    }
}

/// Difference between two consecutive snapshots
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotDiff {
    /// Bets opened since the previous snapshot
    pub bets_opened: u64,

    /// Bets settled since the previous snapshot
    pub bets_settled: u64,

    /// Bots that appeared
    pub appeared: Vec<String>,

    /// Bots that disappeared
    pub disappeared: Vec<String>,

    /// Cycle violations found in the newer snapshot
    pub violations: Vec<String>,
}

impl SnapshotDiff {
    pub fn between(prev: &BotSnapshot, next: &BotSnapshot) -> Self {
        let mut bets_opened = 0u64;
        let mut bets_settled = 0u64;
        let mut appeared = Vec::new();
        let mut disappeared = Vec::new();

        for obs in &next.observations {
            match prev.find(&obs.name) {
                Some(before) => {
                    if obs.active_bets > before.active_bets {
                        bets_opened += obs.active_bets - before.active_bets;
                    } else {
                        bets_settled += before.active_bets - obs.active_bets;
                    }
                }
                None => appeared.push(obs.name.clone()),
            }
        }

        for obs in &prev.observations {
            if next.find(&obs.name).is_none() {
                disappeared.push(obs.name.clone());
            }
        }

        Self {
            bets_opened,
            bets_settled,
            appeared,
            disappeared,
            violations: next.violations(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.bets_opened == 0
            && self.bets_settled == 0
            && self.appeared.is_empty()
            && self.disappeared.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(bots: Value) -> BotSnapshot {
        BotSnapshot::from_response(&json!({ "bots": bots }))
    }

    #[test]
    fn test_observation_from_json() {
        let bot = json!({
            "name": "bot-1",
            "is_active": true,
            "active_bets_count": 3,
            "cycle_games": 12,
            "min_bet_amount": 1.0,
            "max_bet_amount": 50.0,
            "cycle_total_bet_amount": 306.0
        });
        let obs = BotObservation::from_json(&bot).unwrap();
        assert_eq!(obs.name, "bot-1");
        assert_eq!(obs.active_bets, 3);
        assert!(obs.violations().is_empty());
    }

    #[test]
    fn test_observation_flags_overrun() {
        let bot = json!({
            "name": "bot-2",
            "is_active": true,
            "active_bets_count": 20,
            "cycle_games": 12
        });
        let obs = BotObservation::from_json(&bot).unwrap();
        assert_eq!(obs.violations().len(), 1);
    }

    #[test]
    fn test_diff_counts_bet_movement() {
        let prev = snapshot(json!([
            { "name": "bot-1", "is_active": true, "active_bets_count": 2 },
            { "name": "bot-2", "is_active": true, "active_bets_count": 5 }
        ]));
        let next = snapshot(json!([
            { "name": "bot-1", "is_active": true, "active_bets_count": 4 },
            { "name": "bot-2", "is_active": true, "active_bets_count": 1 },
            { "name": "bot-3", "is_active": true, "active_bets_count": 0 }
        ]));

        let diff = SnapshotDiff::between(&prev, &next);
        assert_eq!(diff.bets_opened, 2);
        assert_eq!(diff.bets_settled, 4);
        assert_eq!(diff.appeared, vec!["bot-3"]);
        assert!(diff.disappeared.is_empty());
        assert!(!diff.is_quiet());
    }

    #[test]
    fn test_identical_snapshots_are_quiet() {
        let bots = json!([{ "name": "bot-1", "is_active": true, "active_bets_count": 2 }]);
        let prev = snapshot(bots.clone());
        let next = snapshot(bots);
        assert!(SnapshotDiff::between(&prev, &next).is_quiet());
    }
}
