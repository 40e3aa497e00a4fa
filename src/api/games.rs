//! Game endpoint helpers
//!
//! Creating, joining, inspecting, and cancelling Rock-Paper-Scissors games.

#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Map, Value};

use crate::http::{ApiClient, ApiResponse};

/// RPS moves accepted by the backend
pub const MOVES: [&str; 3] = ["rock", "paper", "scissors"];

/// POST /api/games/create
///
/// `bet_gems` maps gem type to quantity, e.g. `{"ruby": 5}`.
pub async fn create(
    client: &ApiClient,
    token: &str,
    bet_gems: &[(&str, u32)],
    player_move: &str,
) -> Result<ApiResponse> {
    let mut gems = Map::new();
    for (gem_type, quantity) in bet_gems {
        gems.insert((*gem_type).to_string(), Value::from(*quantity));
    }

    client
        .post_auth(
            "/api/games/create",
            json!({"bet_gems": gems, "move": player_move}),
            token,
        )
        .await
}

/// POST /api/games/{id}/join
pub async fn join(
    client: &ApiClient,
    token: &str,
    game_id: &str,
    player_move: &str,
) -> Result<ApiResponse> {
    client
        .post_auth(
            &format!("/api/games/{game_id}/join"),
            json!({"move": player_move}),
            token,
        )
        .await
}

/// GET /api/games/{id}
pub async fn get(client: &ApiClient, token: &str, game_id: &str) -> Result<ApiResponse> {
    client.get_auth(&format!("/api/games/{game_id}"), token).await
}

/// GET /api/games/available
pub async fn available(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/games/available", token).await
}

/// POST /api/games/{id}/cancel
///
/// Same recovery path the backend's timeout monitor takes for stale
/// WAITING games.
pub async fn cancel(client: &ApiClient, token: &str, game_id: &str) -> Result<ApiResponse> {
    client
        .post_auth(&format!("/api/games/{game_id}/cancel"), json!({}), token)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves() {
        assert_eq!(MOVES.len(), 3);
        assert!(MOVES.contains(&"rock"));
    }
}
