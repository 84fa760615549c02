//! Clock - Time source abstraction
//!
//! Interest accrual is a function of elapsed wall-clock time, so the time
//! source is injected. `SystemClock` is the production implementation;
//! `ManualClock` gives tests full control over elapsed time.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Time source for accrual timestamps
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually-driven time source for tests.
///
/// Starts at a fixed instant and only moves when told to.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Create a clock starting at the unix epoch
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write().unwrap() = instant;
    }

    /// Advance the clock by whole seconds
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.write().unwrap();
        *now = *now + Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::at_epoch();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::at_epoch();
        let before = clock.now();
        clock.advance_secs(3600);
        assert_eq!((clock.now() - before).num_seconds(), 3600);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::at_epoch();
        let target = DateTime::<Utc>::UNIX_EPOCH + Duration::days(365);
        clock.set(target);
        assert_eq!(clock.now(), target);
    }
}
