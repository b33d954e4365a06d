//! Source of "now" for remaining-time calculations.
//!
//! Deadlines and clocks share one epoch (Unix milliseconds). Tests use
//! [`MonotonicClock::anchored_at`] so that paused tokio time drives the clock.

use chrono::Utc;
use tokio::time::Instant;

/// Abstraction over the current time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall-clock reading taken once, advanced by the tokio monotonic clock.
///
/// Unaffected by wall-clock adjustments while the timer runs.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor_millis: i64,
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::anchored_at(SystemClock.now_millis())
    }

    /// Treat the current tokio instant as `anchor_millis`.
    pub fn anchored_at(anchor_millis: i64) -> Self {
        Self {
            anchor_millis,
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> i64 {
        let elapsed = i64::try_from(self.anchor.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.anchor_millis.saturating_add(elapsed)
    }
}
