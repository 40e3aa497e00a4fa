//! Auth scenarios
//!
//! Scenarios 1-3: User Registration, User Login, Admin Auth

#![allow(dead_code)]

use anyhow::Result;
use tracing::{debug, info};

use crate::api::{admin, auth};
use crate::api::auth::{NewUser, Session};
use crate::http::ApiClient;
use crate::models::{Scenario, ScenarioResult};

/// Scenario 1: register a fresh account and verify the echoed profile
#[derive(Clone, Debug)]
pub struct RegistrationScenario {
    pub prefix: String,
}

impl RegistrationScenario {
    pub fn new() -> Self {
        Self {
            prefix: "qa_reg".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running User Registration scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let user = NewUser::random(&self.prefix);
        debug!("Registering {}", user.email);

        let resp = auth::register(client, &user).await?;

        if resp.is_success() {
            details.push(format!(
                "✓ register returned {} ({}ms)",
                resp.status_code, resp.duration_ms
            ));
        } else {
            all_passed = false;
            details.push(format!("✗ register returned status {}", resp.status_code));
        }

        match Session::from_response(&resp) {
            Some(session) => {
                details.push(format!("✓ token issued for user {}", session.user_id));

                if session.username == user.username {
                    details.push(format!("✓ username echoed as {}", session.username));
                } else {
                    all_passed = false;
                    details.push(format!(
                        "✗ username echoed as {} expected {}",
                        session.username, user.username
                    ));
                }

                // Token must be usable straight away
                let me = auth::me(client, &session.token).await?;
                let profile_id = me.str_field("/id").or_else(|| me.str_field("/user/id"));
                if me.is_success() && profile_id == Some(session.user_id.as_str()) {
                    details.push(format!("✓ /auth/me resolves to {} ({}ms)", session.user_id, me.duration_ms));
                } else {
                    all_passed = false;
                    details.push(format!(
                        "✗ /auth/me returned status {} for a fresh token",
                        me.status_code
                    ));
                }
            }
            None => {
                all_passed = false;
                details.push("✗ response carried no token or user id".to_string());
            }
        }

        Ok(ScenarioResult::from_checks(
            Scenario::UserRegistration,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for RegistrationScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 2: register, then log in with the same credentials
#[derive(Clone, Debug)]
pub struct LoginScenario {
    pub prefix: String,
}

impl LoginScenario {
    pub fn new() -> Self {
        Self {
            prefix: "qa_login".to_string(),
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running User Login scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let user = NewUser::random(&self.prefix);
        let reg = auth::register(client, &user).await?;
        if !reg.is_success() {
            return Ok(ScenarioResult::fail(
                Scenario::UserLogin,
                start.elapsed().as_millis() as u64,
                format!("precondition failed: register returned {}", reg.status_code),
            ));
        }

        let resp = auth::login(client, &user.email, &user.password).await?;
        match Session::from_response(&resp) {
            Some(session) if resp.is_success() => {
                details.push(format!(
                    "✓ login issued token ({}ms)",
                    resp.duration_ms
                ));

                let me = auth::me(client, &session.token).await?;
                if me.is_success() {
                    details.push("✓ login token accepted by /auth/me".to_string());
                } else {
                    all_passed = false;
                    details.push(format!(
                        "✗ login token rejected by /auth/me with {}",
                        me.status_code
                    ));
                }
            }
            _ => {
                all_passed = false;
                details.push(format!(
                    "✗ login returned status {} without a usable token",
                    resp.status_code
                ));
            }
        }

        // Wrong password must be rejected
        let bad = auth::login(client, &user.email, "WrongPassword1!").await?;
        if bad.is_unauthorized() {
            details.push(format!("✓ wrong password rejected with {}", bad.status_code));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ wrong password answered with {} expected 401/403",
                bad.status_code
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::UserLogin,
            all_passed,
            start.elapsed().as_millis() as u64,
            details,
        ))
    }
}

impl Default for LoginScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Scenario 3: admin login grants the admin surface, anonymous calls do not
#[derive(Clone, Debug)]
pub struct AdminAuthScenario {
    pub email: String,
    pub password: String,
}

impl AdminAuthScenario {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub async fn run(&self, client: &ApiClient) -> Result<ScenarioResult> {
        info!("Running Admin Auth scenario");
        let start = std::time::Instant::now();
        let mut all_passed = true;
        let mut details = Vec::new();

        let resp = auth::login(client, &self.email, &self.password).await?;
        let session = match Session::from_response(&resp) {
            Some(session) if resp.is_success() => {
                details.push(format!("✓ admin login as {} ({}ms)", self.email, resp.duration_ms));
                session
            }
            _ => {
                return Ok(ScenarioResult::fail(
                    Scenario::AdminAuth,
                    start.elapsed().as_millis() as u64,
                    format!("✗ admin login returned status {}", resp.status_code),
                ));
            }
        };

        let me = auth::me(client, &session.token).await?;
        let role = me
            .str_field("/role")
            .or_else(|| me.str_field("/user/role"))
            .unwrap_or("");
        if role.eq_ignore_ascii_case("admin") || role.eq_ignore_ascii_case("super_admin") {
            details.push(format!("✓ profile role is {role}"));
        } else {
            all_passed = false;
            details.push(format!("✗ profile role is '{role}' expected admin"));
        }

        let stats = admin::stats(client, &session.token).await?;
        if stats.is_success() {
            details.push(format!("✓ admin stats endpoint accepted the token ({}ms)", stats.duration_ms));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ admin stats endpoint answered {} for an admin token",
                stats.status_code
            ));
        }

        // The same endpoint must refuse anonymous callers
        let anon = client.get("/api/admin/stats").await?;
        if anon.is_unauthorized() {
            details.push(format!("✓ anonymous admin call rejected with {}", anon.status_code));
        } else {
            all_passed = false;
            details.push(format!(
                "✗ anonymous admin call answered {} expected 401/403",
                anon.status_code
            ));
        }

        Ok(ScenarioResult::from_checks(
            Scenario::AdminAuth,
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
    fn test_registration_builder() {
        let scenario = RegistrationScenario::new().with_prefix("smoke");
        assert_eq!(scenario.prefix, "smoke");
    }

    #[test]
    fn test_admin_auth_builder() {
        let scenario = AdminAuthScenario::new("admin@gemplay.com", "Admin123!");
        assert_eq!(scenario.email, "admin@gemplay.com");
    }
}
