//! Admin endpoint helpers
//!
//! Bot inventory, limits, platform stats, and the timeout monitor summary.
//! All calls require an admin bearer token.

#![allow(dead_code)]

use anyhow::Result;

use crate::http::{ApiClient, ApiResponse};

/// GET /api/admin/bots
pub async fn bots(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/admin/bots", token).await
}

/// GET /api/admin/bots/limits
pub async fn bot_limits(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/admin/bots/limits", token).await
}

/// GET /api/admin/human-bots
pub async fn human_bots(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/admin/human-bots", token).await
}

/// GET /api/admin/stats
pub async fn stats(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/admin/stats", token).await
}

/// GET /api/admin/timeouts/summary
pub async fn timeouts_summary(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/admin/timeouts/summary", token).await
}
