//! Auth endpoint helpers
//!
//! Registration, login, and profile lookup against `/api/auth/*`.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::http::{ApiClient, ApiResponse};

/// Payload for registering a fresh account
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: String,
}

impl NewUser {
    /// Build a unique throwaway account so repeated runs never collide
    pub fn random(prefix: &str) -> Self {
        let suffix: u32 = rand::random::<u32>() % 1_000_000;
        Self {
            username: format!("{prefix}_{suffix:06}"),
            email: format!("{prefix}_{suffix:06}@qa.gemplay.test"),
            password: "QaTester123!".to_string(),
            gender: "male".to_string(),
        }
    }
}

/// Authenticated session extracted from an auth response
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

impl Session {
    /// Extract token and user identity from a register/login response
    pub fn from_response(resp: &ApiResponse) -> Option<Self> {
        let token = resp.str_field("/token")?.to_string();
        let user_id = resp.str_field("/user/id")?.to_string();
        let username = resp
            .str_field("/user/username")
            .unwrap_or_default()
            .to_string();
        Some(Self {
            token,
            user_id,
            username,
        })
    }
}

/// POST /api/auth/register
pub async fn register(client: &ApiClient, user: &NewUser) -> Result<ApiResponse> {
    client
        .post(
            "/api/auth/register",
            json!({
                "username": user.username,
                "email": user.email,
                "password": user.password,
                "gender": user.gender,
            }),
        )
        .await
}

/// POST /api/auth/login
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<ApiResponse> {
    client
        .post(
            "/api/auth/login",
            json!({
                "email": email,
                "password": password,
            }),
        )
        .await
}

/// GET /api/auth/me
pub async fn me(client: &ApiClient, token: &str) -> Result<ApiResponse> {
    client.get_auth("/api/auth/me", token).await
}

/// Register a fresh account and return its session, failing when the
/// backend did not hand back a token
pub async fn register_session(client: &ApiClient, prefix: &str) -> Result<Session> {
    let user = NewUser::random(prefix);
    let resp = register(client, &user).await?;
    Session::from_response(&resp).ok_or_else(|| {
        anyhow!(
            "registration of {} returned status {} without a token",
            user.email,
            resp.status_code
        )
    })
}

/// Log in with the configured admin account and return the bearer token
pub async fn admin_session(client: &ApiClient, email: &str, password: &str) -> Result<Session> {
    let resp = login(client, email, password).await?;
    Session::from_response(&resp).ok_or_else(|| {
        anyhow!(
            "admin login as {} returned status {} without a token",
            email,
            resp.status_code
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_user_random_is_unique() {
        let a = NewUser::random("qa");
        let b = NewUser::random("qa");
        assert_ne!(a.email, b.email);
        assert!(a.username.starts_with("qa_"));
        assert!(a.email.ends_with("@qa.gemplay.test"));
    }

    #[test]
    fn test_session_extraction() {
        let body = json!({
            "token": "jwt-abc",
            "user": {"id": "u-42", "username": "qa_000001"}
        });
        let resp = ApiResponse {
            status_code: 200,
            body: body.to_string(),
            json: Some(body),
            duration_ms: 1,
        };

        let session = Session::from_response(&resp).unwrap();
        assert_eq!(session.token, "jwt-abc");
        assert_eq!(session.user_id, "u-42");
        assert_eq!(session.username, "qa_000001");
    }

    #[test]
    fn test_session_extraction_missing_token() {
        let body = json!({"user": {"id": "u-42"}});
        let resp = ApiResponse {
            status_code: 200,
            body: body.to_string(),
            json: Some(body),
            duration_ms: 1,
        };
        assert!(Session::from_response(&resp).is_none());
    }
}
