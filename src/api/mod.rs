//! Typed endpoint helpers for the GemPlay REST API
//!
//! Thin wrappers over [`crate::http::ApiClient`] that keep every REST path in
//! one place. Scenarios assert on the raw responses these functions return.

pub mod admin;
pub mod auth;
pub mod games;
pub mod gems;
