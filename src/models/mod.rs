//! Data models for GemPlay API testing
//!
//! This module contains all data structures used throughout the application.

mod scenario;
mod target;

pub use scenario::{RoundSummary, Scenario, ScenarioResult, ScenarioStatus};
pub use target::{AdminCredentials, SuiteConfig, TargetConfig};
