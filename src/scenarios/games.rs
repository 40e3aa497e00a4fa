//! Game scenarios
//!
//! Scenarios 8-11: Game Creation, Game Join, RPS Resolution,
//! Bet Timeout Recovery

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::api::auth::Session;
use crate::api::{admin, auth, games, gems};
use crate::http::ApiClient;
use crate::models::{Scenario, ScenarioResult};
use crate::scenarios::checks::{self, RpsOutcome};

/// Register a fresh account holding enough gems to bet with
async fn funded_player(
    client: &ApiClient,
    prefix: &str,
    gem_type: &str,
    quantity: u32,
) -> Result<Session> {
    let session = auth::register_session(client, prefix).await?;
    let buy = gems::buy(client, &session.token, gem_type, quantity).await?;
    if !buy.is_success() {
        return Err(anyhow!(
            "funding {} with {} x{} failed with status {}",
            session.username,
            gem_type,
            quantity,
            buy.status_code
        ));
    }
    Ok(session)
}

/// Read the caller's frozen balance
async fn frozen_balance(client: &ApiClient, token: &str) -> Result<f64> {
    let resp = gems::balance(client, token).await?;
    resp.f64_field("/frozen_balance")
        .ok_or_else(|| anyhow!("balance endpoint answered {} without frozen_balance", resp.status_code))
}

/// Scenario 8: creating a game freezes the bet and parks it WAITING
#[derive(Clone, Debug)]
pub struct GameCreationScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl GameCreationScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 5,
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Game Creation scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let creator = funded_player(client, "qa_game", &self.gem_type, self.quantity).await?;

        let resp = games::create(
            client,
            &creator.token,
            &[(self.gem_type.as_str(), self.quantity)],
            "rock",
        )
        .await?;

        if resp.is_success() {
            details.push(format!("✓ create accepted ({}ms)", resp.duration_ms));
        } else {
            all_passed = false;
            details.push(format!("✗ create returned status {}", resp.status_code));
        }

        match resp.str_field("/game_id") {
            Some(game_id) => details.push(format!("✓ game id {game_id}")),
            None => {
                all_passed = false;
                details.push("✗ game_id missing from response".to_string());
            }
        }

        match resp.str_field("/status") {
            Some("WAITING") => details.push("✓ game is WAITING for an opponent".to_string()),
            Some(status) => {
                all_passed = false;
                details.push(format!("✗ fresh game has status {status} expected WAITING"));
            }
            None => {
                all_passed = false;
                details.push("✗ status missing from response".to_string());
            }
        }

        // The bet value must be locked against the creator
        let bet_amount = resp.f64_field("/bet_amount").unwrap_or(0.0);
        let frozen = frozen_balance(client, &creator.token).await?;
        if bet_amount > 0.0 && checks::money_eq(frozen, bet_amount) {
            details.push(format!("✓ ${frozen:.2} frozen for the waiting bet"));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ frozen balance ${frozen:.2} expected ${bet_amount:.2}"
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GameCreation,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for GameCreationScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 9: a second player can find and join a waiting game
#[derive(Clone, Debug)]
pub struct GameJoinScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl GameJoinScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 3,
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Game Join scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let creator = funded_player(client, "qa_join_a", &self.gem_type, self.quantity).await?;
        let opponent = funded_player(client, "qa_join_b", &self.gem_type, self.quantity).await?;

        let created = games::create(
            client,
            &creator.token,
            &[(self.gem_type.as_str(), self.quantity)],
            "rock",
        )
        .await?;
        let game_id = created
            .str_field("/game_id")
            .ok_or_else(|| anyhow!("create returned {} without game_id", created.status_code))?
            .to_string();

        // Waiting game must be visible to the joining player
        let listing = games::available(client, &opponent.token).await?;
        let listed = listing
            .array_field("/games")
            .map(|gs| {
                gs.iter().any(|g| {
                    g.pointer("/game_id").and_then(serde_json::Value::as_str) == Some(game_id.as_str())
                })
            })
            .unwrap_or(false);
        if listed {
            details.push("✓ waiting game listed as available".to_string());
        } else {
            all_passed = false;
            details.push("✗ waiting game missing from the available list".to_string());
        }

        debug!("Joining game {game_id}");
        let joined = games::join(client, &opponent.token, &game_id, "paper").await?;

        if joined.is_success() {
            details.push(format!("✓ join accepted ({}ms)", joined.duration_ms));
        } else {
            all_passed = false;
            details.push(format!("✗ join returned status {}", joined.status_code));
        }

        match joined.str_field("/status") {
            Some("WAITING") => {
                all_passed = false;
                details.push("✗ game still WAITING after a join".to_string());
            }
            Some(status) => details.push(format!("✓ game moved to {status}")),
            None => {
                all_passed = false;
                details.push("✗ status missing from join response".to_string());
            }
        }

        let game = games::get(client, &creator.token, &game_id).await?;
        let creator_ok = game.str_field("/creator_id") == Some(creator.user_id.as_str());
        let opponent_ok = game.str_field("/opponent_id") == Some(opponent.user_id.as_str());
        if creator_ok && opponent_ok {
            details.push("✓ both participants recorded on the game".to_string());
        } else {
            all_passed = false;
            details.push("✗ participant ids missing or wrong on the game".to_string());
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GameJoin,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for GameJoinScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 10: the backend resolves move pairs by the RPS rules table
#[derive(Clone, Debug)]
pub struct RpsResolutionScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl RpsResolutionScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 2,
        }
    }

    /// Play one full game and check the reported winner against the rules
    async fn play_pair(
        &self,
        client: &ApiClient,
        creator_move: &str,
        opponent_move: &str,
        details: &mut Vec<String>,
    ) -> Result<bool> {
        let creator = funded_player(client, "qa_rps_a", &self.gem_type, self.quantity).await?;
        let opponent = funded_player(client, "qa_rps_b", &self.gem_type, self.quantity).await?;

        let created = games::create(
            client,
            &creator.token,
            &[(self.gem_type.as_str(), self.quantity)],
            creator_move,
        )
        .await?;
        let game_id = created
            .str_field("/game_id")
            .ok_or_else(|| anyhow!("create returned {} without game_id", created.status_code))?
            .to_string();

        let joined = games::join(client, &opponent.token, &game_id, opponent_move).await?;
        if !joined.is_success() {
            details.push(format!(
                "✗ {creator_move} vs {opponent_move}: join returned {}",
                joined.status_code
            ));
            return Ok(false);
        }

        let expected = checks::rps_winner(creator_move, opponent_move)
            .ok_or_else(|| anyhow!("invalid move pair {creator_move}/{opponent_move}"))?;
        let winner_id = joined.str_field("/winner_id");

        let correct = match expected {
            RpsOutcome::CreatorWins => winner_id == Some(creator.user_id.as_str()),
            RpsOutcome::OpponentWins => winner_id == Some(opponent.user_id.as_str()),
            RpsOutcome::Draw => winner_id.is_none() || winner_id == Some(""),
        };

        if correct {
            details.push(format!(
                "✓ {creator_move} vs {opponent_move} resolved as {expected:?}"
            ));
        } else {
            details.push(format!(
                "✗ {creator_move} vs {opponent_move}: winner_id {winner_id:?} contradicts {expected:?}"
            ));
        }

        // Draws must leave nothing frozen on either side
        if expected == RpsOutcome::Draw && correct {
            let frozen = frozen_balance(client, &creator.token).await?;
            if checks::money_eq(frozen, 0.0) {
                details.push("✓ draw returned the creator's bet".to_string());
            } else {
                details.push(format!("✗ draw left ${frozen:.2} frozen on the creator"));
                return Ok(false);
            }
        }

        Ok(correct)
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running RPS Resolution scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        // A decisive pair each way plus a draw covers all three outcomes
        for (creator_move, opponent_move) in [("rock", "paper"), ("paper", "rock"), ("rock", "rock")] {
            all_passed &= self
                .play_pair(client, creator_move, opponent_move, &mut details)
                .await?;
        }

        Ok(ScenarioResult::from_checks(
            Scenario::RpsResolution,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for RpsResolutionScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 11: cancelling an unmatched game returns the frozen bet
///
/// Exercises the same recovery path the backend's timeout monitor applies to
/// stale WAITING games, without the multi-minute wait.
#[derive(Clone, Debug)]
pub struct TimeoutRecoveryScenario {
    pub gem_type: String,
    pub quantity: u32,
    pub admin_email: String,
    pub admin_password: String,
}

impl TimeoutRecoveryScenario {
    pub fn new(admin_email: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 4,
            admin_email: admin_email.into(),
            admin_password: admin_password.into(),
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Bet Timeout Recovery scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let creator = funded_player(client, "qa_timeout", &self.gem_type, self.quantity).await?;

        let created = games::create(
            client,
            &creator.token,
            &[(self.gem_type.as_str(), self.quantity)],
            "scissors",
        )
        .await?;
        let game_id = created
            .str_field("/game_id")
            .ok_or_else(|| anyhow!("create returned {} without game_id", created.status_code))?
            .to_string();

        let frozen_before = frozen_balance(client, &creator.token).await?;
        if frozen_before > 0.0 {
            details.push(format!("✓ ${frozen_before:.2} frozen while WAITING"));
        } else {
            all_passed = false;
            details.push("✗ nothing frozen for the waiting bet".to_string());
        }

        let cancelled = games::cancel(client, &creator.token, &game_id).await?;
        if cancelled.is_success() {
            details.push(format!("✓ cancel accepted ({}ms)", cancelled.duration_ms));
        } else {
            all_passed = false;
            details.push(format!("✗ cancel returned status {}", cancelled.status_code));
        }

        let game = games::get(client, &creator.token, &game_id).await?;
        match game.str_field("/status") {
            Some("CANCELLED") => details.push("✓ game marked CANCELLED".to_string()),
            Some(status) => {
                all_passed = false;
                details.push(format!("✗ game status {status} expected CANCELLED"));
            }
            None => {
                all_passed = false;
                details.push("✗ status missing from game".to_string());
            }
        }

        let frozen_after = frozen_balance(client, &creator.token).await?;
        if checks::money_eq(frozen_after, 0.0) {
            details.push("✓ frozen balance returned to $0.00".to_string());
        } else {
            all_passed = false;
            details.push(format!("✗ ${frozen_after:.2} still frozen after cancel"));
        }

        // Cross-check the timeout monitor's own books
        let admin_session =
            auth::admin_session(client, &self.admin_email, &self.admin_password).await?;
        let summary = admin::timeouts_summary(client, &admin_session.token).await?;
        let checked = summary.u64_field("/checked").unwrap_or(0);
        let refunded = summary.u64_field("/refunded").unwrap_or(0);
        if summary.is_success() && refunded <= checked {
            details.push(format!(
                "✓ timeout monitor consistent ({refunded} refunded of {checked} checked)"
            ));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ timeout summary inconsistent: status {}, {refunded} refunded of {checked} checked",
                summary.status_code
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::BetTimeoutRecovery,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_builder() {
        let scenario = GameCreationScenario::new();
        assert_eq!(scenario.gem_type, "ruby");
        assert_eq!(scenario.quantity, 5);
    }

    #[test]
    fn test_timeout_builder() {
        let scenario = TimeoutRecoveryScenario::new("admin@gemplay.com", "Admin123!");
        assert_eq!(scenario.admin_email, "admin@gemplay.com");
        assert_eq!(scenario.gem_type, "ruby");
    }
}
