//! Results storage and reporting module
//!
//! Provides persistent storage, comparison, and report generation for suite
//! results.

#![allow(dead_code)]

mod compare;
mod report;
mod storage;

pub use compare::{ComparisonFormatter, EnvironmentComparator};
pub use report::{ReportFormat, ReportGenerator};
pub use storage::{ExportFormat, ResultsStorage, RunConfig, StoredRun};
