//! HTTP client module for GemPlay API testing
//!
//! Provides the JSON API client used by every scenario.

mod client;

pub use client::{ApiClient, ApiRequest, ApiResponse};
