//! QA scenarios against a live GemPlay deployment
//!
//! Four categories:
//! - Auth: registration, login, admin authentication
//! - Economy: catalog, purchase, sale, gift commission
//! - Games: creation, join, RPS resolution, bet timeout recovery
//! - Bots: limits, cycle compliance, ROI stats
//!
//! Every scenario is a builder struct with an async
//! `run(&ApiClient) -> Result<ScenarioResult>`. Scenarios create their own
//! throwaway accounts; only the Bots category and the timeout recovery check
//! need admin credentials from the target configuration.

pub mod auth;
pub mod bots;
pub mod checks;
pub mod economy;
pub mod games;

use anyhow::Result;
use tracing::debug;

use crate::http::ApiClient;
use crate::models::{Scenario, ScenarioResult, TargetConfig};

/// Run a single scenario against the target
pub async fn run_scenario(
    scenario: Scenario,
    client: &ApiClient,
    target: &TargetConfig,
) -> Result<ScenarioResult> {
    debug!("Dispatching scenario {} ({})", scenario.number(), scenario.name());
    let admin = &target.admin;

    match scenario {
        Scenario::UserRegistration => auth::RegistrationScenario::new().run(client).await,
        Scenario::UserLogin => auth::LoginScenario::new().run(client).await,
        Scenario::AdminAuth => {
            auth::AdminAuthScenario::new(&admin.email, &admin.password)
                .run(client)
                .await
        }
        Scenario::GemCatalog => economy::CatalogScenario::new().run(client).await,
        Scenario::GemPurchase => economy::PurchaseScenario::new().run(client).await,
        Scenario::GemSale => economy::SaleScenario::new().run(client).await,
        Scenario::GiftCommission => economy::GiftScenario::new().run(client).await,
        Scenario::GameCreation => games::GameCreationScenario::new().run(client).await,
        Scenario::GameJoin => games::GameJoinScenario::new().run(client).await,
        Scenario::RpsResolution => games::RpsResolutionScenario::new().run(client).await,
        Scenario::BetTimeoutRecovery => {
            games::TimeoutRecoveryScenario::new(&admin.email, &admin.password)
                .run(client)
                .await
        }
        Scenario::BotLimits => {
            bots::BotLimitsScenario::new(&admin.email, &admin.password)
                .run(client)
                .await
        }
        Scenario::CycleCompliance => {
            bots::CycleComplianceScenario::new(&admin.email, &admin.password)
                .run(client)
                .await
        }
        Scenario::BotRoiStats => {
            bots::BotRoiScenario::new(&admin.email, &admin.password)
                .run(client)
                .await
        }
    }
}

/// Run every scenario in numeric order
pub async fn run_all(client: &ApiClient, target: &TargetConfig) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    for scenario in Scenario::all() {
        let result = match run_scenario(scenario, client, target).await {
            Ok(result) => result,
            Err(e) => ScenarioResult::error(scenario, e.to_string()),
        };
        results.push(result);
    }
    results
}

#[cfg(test)]
mod tests {
    use crate::models::Scenario;

    #[test]
    fn test_every_scenario_has_a_category() {
        for scenario in Scenario::all() {
            assert!(!scenario.category().is_empty());
        }
    }

    #[test]
    fn test_admin_scenarios_marked() {
        assert!(Scenario::BotLimits.requires_admin());
        assert!(Scenario::BetTimeoutRecovery.requires_admin());
        assert!(!Scenario::UserRegistration.requires_admin());
    }
}
