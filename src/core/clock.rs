//! Clock abstraction so the limiter window and gameweek deadlines can be
//! driven by fake time in tests.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Monotonic milliseconds since an arbitrary origin.
    fn now_millis(&self) -> u64;

    /// Wall-clock time, used for comparing against gameweek deadlines.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real time: `Instant` for the monotonic reading, `Utc::now()` for the wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Both readings move together when advanced.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch: DateTime<Utc>,
    elapsed_ms: AtomicU64,
}

impl ManualClock {
    /// Start at `epoch` on the wall clock and at 0 on the monotonic clock.
    pub fn starting_at(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            elapsed_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute monotonic reading.
    pub fn set_millis(&self, ms: u64) {
        self.elapsed_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let elapsed = i64::try_from(self.now_millis()).unwrap_or(i64::MAX);
        self.epoch + TimeDelta::milliseconds(elapsed)
    }
}
