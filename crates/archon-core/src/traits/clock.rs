//! ABOUTME: Injectable clock so time-dependent logic is deterministically testable
//! ABOUTME: Production code uses `SystemClock`; tests use a fixed or steppable clock

use chrono::{DateTime, Utc};

/// Source of the current time. Every component that stamps timestamps
/// (correlation ids, cache expiry, usage records, workflow timing) takes
/// `&dyn Clock` rather than calling `Utc::now()` directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_returns_monotonically_nondecreasing_time() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
