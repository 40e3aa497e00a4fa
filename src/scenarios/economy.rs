//! Gem economy scenarios
//!
//! Scenarios 4-7: Gem Catalog, Gem Purchase, Gem Sale, Gift Commission

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{auth, gems};
use crate::http::ApiClient;
use crate::models::{Scenario, ScenarioResult};
use crate::scenarios::checks;

/// Look up a gem's unit price in the catalog response
fn price_of(catalog: &Value, gem_type: &str) -> Option<f64> {
    catalog
        .pointer("/gems")?
        .as_array()?
        .iter()
        .find(|g| g.pointer("/type").and_then(Value::as_str) == Some(gem_type))
        .and_then(|g| g.pointer("/price"))
        .and_then(Value::as_f64)
}

/// Read the caller's virtual balance
async fn virtual_balance(client: &ApiClient, token: &str) -> Result<f64> {
    let resp = gems::balance(client, token).await?;
    resp.f64_field("/virtual_balance")
        .ok_or_else(|| anyhow!("balance endpoint answered {} without virtual_balance", resp.status_code))
}

/// Scenario 4: catalog carries all seven gem types with ascending prices
#[derive(Clone, Debug, Default)]
pub struct CatalogScenario;

impl CatalogScenario {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Gem Catalog scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let resp = gems::catalog(client).await?;
        if !resp.is_success() {
            return Ok(ScenarioResult::fail(
                Scenario::GemCatalog,
                start.elapsed().as_millis() as u64,
                format!("✗ catalog returned status {}", resp.status_code),
            ));
        }
        let catalog = resp.require_json()?;

        let mut last_price = 0.0;
        for gem_type in gems::GEM_TYPES {
            match price_of(catalog, gem_type) {
                Some(price) if price > 0.0 => {
                    if price > last_price {
                        details.push(format!("✓ {gem_type} priced at ${price:.2}"));
                    } else {
                        all_passed = false;
                        details.push(format!(
                            "✗ {gem_type} priced at ${price:.2}, not above the cheaper tier ${last_price:.2}"
                        ));
                    }
                    last_price = price;
                }
                Some(price) => {
                    all_passed = false;
                    details.push(format!("✗ {gem_type} has non-positive price {price}"));
                }
                None => {
                    all_passed = false;
                    details.push(format!("✗ {gem_type} missing from catalog"));
                }
            }
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GemCatalog,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

/// Scenario 5: buying gems charges exactly price × quantity
#[derive(Clone, Debug)]
pub struct PurchaseScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl PurchaseScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 5,
        }
    }

    pub fn with_gem(mut self, gem_type: impl Into<String>, quantity: u32) -> Self {
        self.gem_type = gem_type.into();
        self.quantity = quantity;
        self
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Gem Purchase scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let session = auth::register_session(client, "qa_buy").await?;
        let balance_before = virtual_balance(client, &session.token).await?;

        let catalog_resp = gems::catalog(client).await?;
        let unit_price = price_of(catalog_resp.require_json()?, &self.gem_type)
            .ok_or_else(|| anyhow!("{} missing from catalog", self.gem_type))?;
        let expected_cost = checks::round2(unit_price * self.quantity as f64);

        debug!(
            "Buying {} x{} for an expected ${expected_cost:.2}",
            self.gem_type, self.quantity
        );
        let resp = gems::buy(client, &session.token, &self.gem_type, self.quantity).await?;

        if resp.is_success() {
            details.push(format!(
                "✓ buy {} x{} accepted ({}ms)",
                self.gem_type, self.quantity, resp.duration_ms
            ));
        } else {
            all_passed = false;
            details.push(format!("✗ buy returned status {}", resp.status_code));
        }

        match resp.f64_field("/total_cost") {
            Some(cost) if checks::money_eq(cost, expected_cost) => {
                details.push(format!("✓ total_cost == ${cost:.2}"));
            }
            Some(cost) => {
                all_passed = false;
                details.push(format!(
                    "✗ total_cost ${cost:.2} expected ${expected_cost:.2}"
                ));
            }
            None => {
                all_passed = false;
                details.push("✗ total_cost missing from response".to_string());
            }
        }

        let balance_after = virtual_balance(client, &session.token).await?;
        let expected_balance = checks::round2(balance_before - expected_cost);
        if checks::money_eq(balance_after, expected_balance) {
            details.push(format!(
                "✓ balance ${balance_before:.2} -> ${balance_after:.2}"
            ));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ balance ${balance_after:.2} expected ${expected_balance:.2}"
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GemPurchase,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for PurchaseScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 6: selling bought gems credits the proceeds back
#[derive(Clone, Debug)]
pub struct SaleScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl SaleScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "ruby".to_string(),
            quantity: 3,
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Gem Sale scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let session = auth::register_session(client, "qa_sell").await?;

        let buy = gems::buy(client, &session.token, &self.gem_type, self.quantity).await?;
        if !buy.is_success() {
            return Ok(ScenarioResult::fail(
                Scenario::GemSale,
                start.elapsed().as_millis() as u64,
                format!("precondition failed: buy returned {}", buy.status_code),
            ));
        }

        let balance_before = virtual_balance(client, &session.token).await?;
        let resp = gems::sell(client, &session.token, &self.gem_type, self.quantity).await?;

        if resp.is_success() {
            details.push(format!(
                "✓ sell {} x{} accepted ({}ms)",
                self.gem_type, self.quantity, resp.duration_ms
            ));
        } else {
            all_passed = false;
            details.push(format!("✗ sell returned status {}", resp.status_code));
        }

        match resp.f64_field("/total_value") {
            Some(value) if value > 0.0 => {
                details.push(format!("✓ sale credited ${value:.2}"));

                let balance_after = virtual_balance(client, &session.token).await?;
                let expected = checks::round2(balance_before + value);
                if checks::money_eq(balance_after, expected) {
                    details.push(format!(
                        "✓ balance ${balance_before:.2} -> ${balance_after:.2}"
                    ));
                } else {
                    all_passed = false;
                    details.push(format!(
                        "✗ balance ${balance_after:.2} expected ${expected:.2}"
                    ));
                }
            }
            Some(value) => {
                all_passed = false;
                details.push(format!("✗ sale credited non-positive ${value:.2}"));
            }
            None => {
                all_passed = false;
                details.push("✗ total_value missing from response".to_string());
            }
        }

        // Selling more than owned must fail
        let oversell = gems::sell(client, &session.token, &self.gem_type, 9999).await?;
        if oversell.is_client_error() {
            details.push(format!("✓ overselling rejected with {}", oversell.status_code));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ overselling answered {} expected 4xx",
                oversell.status_code
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GemSale,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for SaleScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 7: gifting charges the documented 3% commission
#[derive(Clone, Debug)]
pub struct GiftScenario {
    pub gem_type: String,
    pub quantity: u32,
}

impl GiftScenario {
    pub fn new() -> Self {
        Self {
            gem_type: "topaz".to_string(),
            quantity: 2,
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Gift Commission scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let sender = auth::register_session(client, "qa_gift_tx").await?;
        let recipient = auth::register_session(client, "qa_gift_rx").await?;

        let buy = gems::buy(client, &sender.token, &self.gem_type, self.quantity).await?;
        if !buy.is_success() {
            return Ok(ScenarioResult::fail(
                Scenario::GiftCommission,
                start.elapsed().as_millis() as u64,
                format!("precondition failed: buy returned {}", buy.status_code),
            ));
        }

        let catalog_resp = gems::catalog(client).await?;
        let unit_price = price_of(catalog_resp.require_json()?, &self.gem_type)
            .ok_or_else(|| anyhow!("{} missing from catalog", self.gem_type))?;
        let gem_value = checks::round2(unit_price * self.quantity as f64);
        let expected_commission = checks::gift_commission(gem_value);

        let resp = gems::gift(
            client,
            &sender.token,
            &recipient.user_id,
            &self.gem_type,
            self.quantity,
        )
        .await?;

        if resp.is_success() {
            details.push(format!(
                "✓ gift {} x{} to {} accepted ({}ms)",
                self.gem_type, self.quantity, recipient.username, resp.duration_ms
            ));
        } else {
            all_passed = false;
            details.push(format!("✗ gift returned status {}", resp.status_code));
        }

        match resp.f64_field("/commission_amount") {
            Some(commission) if checks::money_eq(commission, expected_commission) => {
                details.push(format!(
                    "✓ commission ${commission:.2} == 3% of ${gem_value:.2}"
                ));
            }
            Some(commission) => {
                all_passed = false;
                details.push(format!(
                    "✗ commission ${commission:.2} expected ${expected_commission:.2}"
                ));
            }
            None => {
                all_passed = false;
                details.push("✗ commission_amount missing from response".to_string());
            }
        }

        // Gift must land in the recipient's inventory
        let inventory = gems::inventory(client, &recipient.token).await?;
        let received = inventory
            .array_field("/gems")
            .map(|gs| {
                gs.iter().any(|g| {
                    g.pointer("/type").and_then(Value::as_str) == Some(self.gem_type.as_str())
                        && g.pointer("/quantity").and_then(Value::as_u64).unwrap_or(0)
                            >= self.quantity as u64
                })
            })
            .unwrap_or(false);
        if received {
            details.push(format!("✓ recipient holds {} x{}", self.gem_type, self.quantity));
        } else {
            all_passed = false;
            details.push("✗ gifted gems missing from recipient inventory".to_string());
        }

        Ok(ScenarioResult::from_checks(
            Scenario::GiftCommission,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for GiftScenario {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_lookup() {
        let catalog = json!({
            "gems": [
                {"type": "ruby", "price": 1.0},
                {"type": "topaz", "price": 5.0},
            ]
        });
        assert_eq!(price_of(&catalog, "topaz"), Some(5.0));
        assert_eq!(price_of(&catalog, "magic"), None);
    }

    #[test]
    fn test_purchase_builder() {
        let scenario = PurchaseScenario::new().with_gem("sapphire", 2);
        assert_eq!(scenario.gem_type, "sapphire");
        assert_eq!(scenario.quantity, 2);
    }
}
