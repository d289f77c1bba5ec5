//! Time sources used to age objects.

use chrono::{DateTime, Duration, Utc};

/// Supplies the elapsed time since a given instant.
///
/// The cleaner never reads the wall clock directly; it asks its clock
/// instead, so tests can pin "now" to a known instant.
pub trait Clock: Send + Sync {
    /// Elapsed time between `t` and this clock's notion of now.
    ///
    /// Negative when `t` lies in the future.
    fn since(&self, t: DateTime<Utc>) -> Duration;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn since(&self, t: DateTime<Utc>) -> Duration {
        Utc::now() - t
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock that always reports `now` as the current time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// The pinned instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl Clock for FixedClock {
    fn since(&self, t: DateTime<Utc>) -> Duration {
        self.now - t
    }
}
