//! Wall-clock timing for probe sessions
//!
//! A probe interleaves HTTP calls with interval sleeps, so its duration has
//! to be measured around the whole session rather than summed per request.

#![allow(dead_code)]

use std::time::{Duration, Instant};

/// Labelled session timer
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Start timing a session
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Elapsed time so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed milliseconds, the unit results and reports carry
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Finish the session, logging the total and returning it in ms
    pub fn finish(self) -> u64 {
        let elapsed_ms = self.elapsed_ms();
        tracing::debug!("{} took {}ms", self.label, elapsed_ms);
        elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_timer_tracks_session_duration() {
        let timer = Timer::start("bot-probe");
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10);
        assert!(timer.finish() >= 10);
    }

    #[test]
    fn test_elapsed_does_not_consume() {
        let timer = Timer::start("sample");
        let first = timer.elapsed_ms();
        let second = timer.elapsed_ms();
        assert!(second >= first);
    }
}
