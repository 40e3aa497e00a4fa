//! Business-rule checks asserted against the backend
//!
//! The remote backend owns all of these rules; this module only computes the
//! expected values the scenarios compare response fields against.

#![allow(dead_code)]

/// Gift commission rate charged by the backend
pub const GIFT_COMMISSION_RATE: f64 = 0.03;

/// Tolerance for comparing money values the backend rounds to 2 decimals
pub const MONEY_EPSILON: f64 = 0.005;

/// Round to 2 decimal places, the backend's money precision
///
/// Half-up on the cent: the nudge keeps exact half-cents like 1.005,
/// stored as 1.00499..., from rounding down.
pub fn round2(value: f64) -> f64 {
    let cents = value * 100.0;
    (cents + 1e-9_f64.copysign(cents)).round() / 100.0
}

/// Expected gift commission: 3% of the gifted gems' dollar value
pub fn gift_commission(gem_value: f64) -> f64 {
    round2(gem_value * GIFT_COMMISSION_RATE)
}

/// Expected total bet volume of a bot cycle: (min + max) / 2 × cycle_games
pub fn cycle_bet_volume(min_bet: f64, max_bet: f64, cycle_games: u64) -> f64 {
    round2((min_bet + max_bet) / 2.0 * cycle_games as f64)
}

/// Active-cycle ROI: (wins − losses) / (wins + losses) × 100
///
/// Returns `None` for bots with no completed volume, where the backend
/// reports 0 or omits the field.
pub fn roi_active(wins_sum: f64, losses_sum: f64) -> Option<f64> {
    let denominator = wins_sum + losses_sum;
    if denominator <= 0.0 {
        None
    } else {
        Some((wins_sum - losses_sum) / denominator * 100.0)
    }
}

/// Two money values equal under the backend's 2-decimal rounding
pub fn money_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < MONEY_EPSILON
}

/// Outcome of an RPS game from the creator's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpsOutcome {
    CreatorWins,
    OpponentWins,
    Draw,
}

/// Resolve an RPS pairing: paper beats rock, rock beats scissors,
/// scissors beats paper
pub fn rps_winner(creator_move: &str, opponent_move: &str) -> Option<RpsOutcome> {
    let beats = |a: &str, b: &str| {
        matches!(
            (a, b),
            ("paper", "rock") | ("rock", "scissors") | ("scissors", "paper")
        )
    };

    let valid = ["rock", "paper", "scissors"];
    if !valid.contains(&creator_move) || !valid.contains(&opponent_move) {
        return None;
    }

    if creator_move == opponent_move {
        Some(RpsOutcome::Draw)
    } else if beats(creator_move, opponent_move) {
        Some(RpsOutcome::CreatorWins)
    } else {
        Some(RpsOutcome::OpponentWins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(2.334), 2.33);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_round2_half_cent_boundaries() {
        // these literals sit just below the half-cent in IEEE 754
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-1.005), -1.01);
    }

    #[test]
    fn test_gift_commission() {
        assert_eq!(gift_commission(100.0), 3.0);
        assert_eq!(gift_commission(1.0), 0.03);
        // 3% of 33.33 is 0.9999, rounded up
        assert_eq!(gift_commission(33.33), 1.0);
        assert_eq!(gift_commission(0.0), 0.0);
    }

    #[test]
    fn test_cycle_bet_volume() {
        // (1 + 100) / 2 * 16 = 808
        assert_eq!(cycle_bet_volume(1.0, 100.0, 16), 808.0);
        // equal min/max degenerates to min * cycle_games
        assert_eq!(cycle_bet_volume(5.0, 5.0, 10), 50.0);
        assert_eq!(cycle_bet_volume(1.0, 2.0, 0), 0.0);
        // cycle_games arrives as u64 straight from the JSON field
        let from_json = serde_json::json!({ "cycle_games": 16 });
        let games = from_json.pointer("/cycle_games").and_then(|v| v.as_u64());
        assert_eq!(cycle_bet_volume(1.0, 100.0, games.unwrap()), 808.0);
    }

    #[test]
    fn test_roi_active() {
        assert_eq!(roi_active(150.0, 50.0), Some(50.0));
        assert_eq!(roi_active(50.0, 150.0), Some(-50.0));
        assert_eq!(roi_active(100.0, 100.0), Some(0.0));
        assert_eq!(roi_active(0.0, 0.0), None);
    }

    #[test]
    fn test_money_eq_tolerates_rounding() {
        assert!(money_eq(3.0, 2.9999999));
        assert!(money_eq(0.03, 0.030000001));
        assert!(!money_eq(3.0, 3.01));
    }

    #[test]
    fn test_rps_winner_full_table() {
        use RpsOutcome::*;
        let table = [
            ("rock", "rock", Draw),
            ("rock", "paper", OpponentWins),
            ("rock", "scissors", CreatorWins),
            ("paper", "rock", CreatorWins),
            ("paper", "paper", Draw),
            ("paper", "scissors", OpponentWins),
            ("scissors", "rock", OpponentWins),
            ("scissors", "paper", CreatorWins),
            ("scissors", "scissors", Draw),
        ];

        for (creator, opponent, expected) in table {
            assert_eq!(
                rps_winner(creator, opponent),
                Some(expected),
                "{creator} vs {opponent}"
            );
        }
    }

    #[test]
    fn test_rps_winner_rejects_unknown_moves() {
        assert_eq!(rps_winner("lizard", "rock"), None);
        assert_eq!(rps_winner("rock", "spock"), None);
    }
}
