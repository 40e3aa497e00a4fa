//! HTTP client for GemPlay API testing
//!
//! Provides a high-level JSON API client for driving the remote backend.

#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Response body is not valid JSON: {0}")]
    InvalidBody(String),
}

/// JSON API client for a single GemPlay deployment
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create a new client for a base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, 30, true)
    }

    /// Create a client with custom timeout and TLS verification
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64, verify_tls: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL from an API path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    /// Send an API request
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(&request.path);
        debug!("Sending {} request to {}", request.method, url);

        let method =
            Method::from_bytes(request.method.as_bytes()).context("Invalid HTTP method")?;

        let mut req_builder = self.client.request(method, &url);

        if let Some(token) = &request.token {
            req_builder = req_builder.bearer_auth(token);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.json {
            req_builder = req_builder.json(body);
        }

        let start = std::time::Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(ApiError::Timeout(self.timeout_secs))
            } else if e.is_connect() {
                anyhow::anyhow!(ApiError::ConnectionRefused(url.clone()))
            } else {
                anyhow::anyhow!(ApiError::RequestFailed(e.to_string()))
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        let json = serde_json::from_str::<Value>(&body).ok();

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(ApiResponse {
            status_code: status.as_u16(),
            body,
            json,
            duration_ms,
        })
    }

    /// GET without authentication
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    /// GET with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path).bearer(token)).await
    }

    /// POST a JSON body without authentication
    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).json(body)).await
    }

    /// POST a JSON body with a bearer token
    pub async fn post_auth(&self, path: &str, body: Value, token: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).json(body).bearer(token)).await
    }

    /// DELETE with a bearer token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path).bearer(token)).await
    }
}

/// API request builder
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: Vec::new(),
            json: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// API response with the parsed JSON body when available
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
    pub json: Option<Value>,
    pub duration_ms: u64,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == StatusCode::UNAUTHORIZED.as_u16()
            || self.status_code == StatusCode::FORBIDDEN.as_u16()
    }

    /// Look up a field by JSON pointer, e.g. `/user/id`
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.json.as_ref().and_then(|j| j.pointer(pointer))
    }

    /// Field as &str
    pub fn str_field(&self, pointer: &str) -> Option<&str> {
        self.field(pointer).and_then(Value::as_str)
    }

    /// Field as f64
    pub fn f64_field(&self, pointer: &str) -> Option<f64> {
        self.field(pointer).and_then(Value::as_f64)
    }

    /// Field as u64
    pub fn u64_field(&self, pointer: &str) -> Option<u64> {
        self.field(pointer).and_then(Value::as_u64)
    }

    /// Field as bool
    pub fn bool_field(&self, pointer: &str) -> Option<bool> {
        self.field(pointer).and_then(Value::as_bool)
    }

    /// Field as array
    pub fn array_field(&self, pointer: &str) -> Option<&Vec<Value>> {
        self.field(pointer).and_then(Value::as_array)
    }

    /// Parsed JSON body, or an error naming the raw text
    pub fn require_json(&self) -> Result<&Value> {
        self.json.as_ref().ok_or_else(|| {
            anyhow::anyhow!(ApiError::InvalidBody(truncate_body(&self.body)))
        })
    }
}

/// Keep error messages readable when the backend returns an HTML error page
fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 120;
    match body.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(json: Value, status: u16) -> ApiResponse {
        ApiResponse {
            status_code: status,
            body: json.to_string(),
            json: Some(json),
            duration_ms: 10,
        }
    }

    #[test]
    fn test_api_request_builder() {
        let req = ApiRequest::post("/api/auth/login")
            .json(json!({"email": "a@b.c"}))
            .bearer("tok")
            .param("verbose", "1");

        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/auth/login");
        assert!(req.json.is_some());
        assert_eq!(req.token.as_deref(), Some("tok"));
        assert_eq!(req.query.len(), 1);
    }

    #[test]
    fn test_response_fields() {
        let resp = response_with(
            json!({"user": {"id": "u-1", "balance": 100.5, "admin": true}}),
            200,
        );

        assert!(resp.is_success());
        assert_eq!(resp.str_field("/user/id"), Some("u-1"));
        assert_eq!(resp.f64_field("/user/balance"), Some(100.5));
        assert_eq!(resp.bool_field("/user/admin"), Some(true));
        assert!(resp.field("/user/missing").is_none());
    }

    #[test]
    fn test_unauthorized_detection() {
        let resp = response_with(json!({"detail": "no"}), 401);
        assert!(resp.is_unauthorized());
        assert!(resp.is_client_error());
        let resp = response_with(json!({"detail": "no"}), 403);
        assert!(resp.is_unauthorized());
    }

    #[test]
    fn test_require_json_on_raw_body() {
        let resp = ApiResponse {
            status_code: 502,
            body: "<html>Bad Gateway</html>".to_string(),
            json: None,
            duration_ms: 5,
        };
        assert!(resp.require_json().is_err());
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(300);
        assert!(truncate_body(&long).len() < 130);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_multibyte() {
        // a localized error page can put a multibyte char right on the cut:
        // the 'é' here straddles byte 120
        let body = format!("{}{}", "x".repeat(119), "établissement".repeat(20));
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 123);

        let short_utf8 = "éèêë".repeat(10);
        assert_eq!(truncate_body(&short_utf8), short_utf8);
    }
}
