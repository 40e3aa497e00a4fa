//! Gem economy endpoint helpers
//!
//! Catalog, purchase, sale, gifting, and balance lookups.

#![allow(dead_code)]

use anyhow::Result;
use serde_json::json;

use crate::http::{ApiClient, ApiResponse};

/// The seven gem types the backend sells, cheapest first
pub const GEM_TYPES: [&str; 7] = [
    "ruby",
    "amber",
    "topaz",
    "emerald",
    "turquoise",
    "sapphire",
    "magic",
];

/// GET /api/gems/catalog
pub async fn catalog(client: &ApiClient) -> Result<ApiResponse> {
    client.get("/api/gems/catalog").await
}

/// POST /api/gems/buy
pub async fn buy(
    client: &ApiClient,
    token: &str,
    gem_type: &str,
    quantity: u32,
) -> Result<ApiResponse> {
    client
        .post_auth(
            "/api/gems/buy",
            json!({"gem_type": gem_type, "quantity": quantity}),
            token,
        )
        .await
}

/// POST /api/gems/sell
pub async fn sell(
    client: &ApiClient,
    token: &str,
    gem_type: &str,
    quantity: u32,
) -> Result<ApiResponse> {
    client
        .post_auth(
            "/api/gems/sell",
            json!({"gem_type": gem_type, "quantity": quantity}),
            token,
        )
        .await
}

/// POST /api/gems/gift
pub async fn gift(
    client: &ApiClient,
    token: &str,
    recipient_id: &str,
    gem_type: &str,
    quantity: u32,
) -> Result<ApiResponse> {
    client
        .post_auth(
            "/api/gems/gift",
            json!({
                "recipient_id": recipient_id,
                "gem_type": gem_type,
                "quantity": quantity,
            }),
            token,
        )
        .await
}

/// GET /api/economy/balance
pub async fn balance(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/economy/balance", token).await
}

/// GET /api/gems/inventory
pub async fn inventory(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/gems/inventory", token).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_types_complete() {
        assert_eq!(GEM_TYPES.len(), 7);
        assert_eq!(GEM_TYPES[0], "ruby");
        assert_eq!(GEM_TYPES[6], "magic");
    }
}
