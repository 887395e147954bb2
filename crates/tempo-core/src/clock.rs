//! # Clock
//!
//! The single wall-clock reference used for every timer transition.
//!
//! The Registry never calls `Utc::now()` itself; it asks its injected
//! [`Clock`]. Production code uses [`SystemClock`], tests drive a
//! [`ManualClock`] so elapsed times are exact.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of the current instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current wall-clock instant.
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// Clock backed by the operating system's UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// MANUAL CLOCK
// =============================================================================

/// Clock whose instant only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to a Registry.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock frozen at the Unix epoch.
    #[must_use]
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Jump to an absolute instant (may move backwards).
    pub fn set(&self, at: DateTime<Utc>) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = at;
    }

    /// Move the clock by `delta`. A negative delta moves it backwards.
    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.checked_add_signed(delta).unwrap_or(*guard);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
