//! Live bot observation
//!
//! The probe watches the bot fleet over time instead of asserting a single
//! point-in-time state: it polls the admin bot endpoint, diffs consecutive
//! snapshots, and reports any cycle accounting violations it sees.

#![allow(dead_code)]

pub mod report;
pub mod runner;
pub mod snapshot;

pub use runner::{ProbeConfig, ProbeOutcome, ProbeRunner};
pub use snapshot::{BotObservation, BotSnapshot, SnapshotDiff};
