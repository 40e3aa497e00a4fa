//! Scenario execution
//!
//! Sequential and parallel runners for the QA suite.

pub mod parallel;
pub mod runner;

pub use parallel::{AggregateResult, BatchRunner, ParallelExecutor, ScenarioStats};
pub use runner::{MultiTargetRunner, SuiteRunner};
