//! Time source for unlock-time comparisons.
//!
//! The ledger never reads the system time directly. It asks an injected
//! [`Clock`], so tests can pin and advance "now" explicitly.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant: hand one clone to the ledger and keep
/// another to advance time from the test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Milliseconds since the UNIX epoch.
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// A clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// A clock frozen at `secs` seconds after the UNIX epoch.
    #[must_use]
    pub fn at_unix(secs: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(secs.saturating_mul(1000))),
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: u64) {
        let delta = i64::try_from(secs).unwrap_or(i64::MAX).saturating_mul(1000);
        let mut current = self.millis.load(Ordering::SeqCst);
        while let Err(actual) = self.millis.compare_exchange_weak(
            current,
            current.saturating_add(delta),
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            current = actual;
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis.store(instant.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_unix(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// `now + lock_secs`, saturating at the largest representable instant.
///
/// A lock too long to represent never unlocks, which is the same outcome
/// the caller asked for.
#[must_use]
pub fn unlock_time_after(now: DateTime<Utc>, lock_secs: u64) -> DateTime<Utc> {
    i64::try_from(lock_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lock| now.checked_add_signed(lock))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
