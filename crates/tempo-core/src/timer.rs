//! # Stage Timer
//!
//! The single-flight timer state machine attached to every Stage.
//!
//! | From    | Operation | To      | Effect                                   |
//! |---------|-----------|---------|------------------------------------------|
//! | Idle    | start     | Running | record `started_at`                      |
//! | Running | start     | Running | `TimerFault::AlreadyRunning`             |
//! | Running | stop      | Idle    | add `now - started_at` to the total      |
//! | Idle    | stop      | Idle    | `TimerFault::NotRunning`                 |
//!
//! A stop whose instant precedes the start fails with
//! `TimerFault::ClockWentBackwards`. Every failed transition leaves the
//! Stage exactly as it was.
//!
//! Elapsed time is kept as integer [`Duration`]s; the only `f64` is the
//! reporting conversion done by callers.

use crate::TimerFault;
use crate::model::Stage;
use chrono::{DateTime, Utc};
use std::time::Duration;

// =============================================================================
// TIMER STATE
// =============================================================================

/// Timer state of a Stage. The start instant exists only while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running { started_at: DateTime<Utc> },
}

impl TimerState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Idle => None,
            Self::Running { started_at } => Some(*started_at),
        }
    }

    /// Lowercase label used in snapshots ("idle" / "running").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// RUN
// =============================================================================

/// A completed start/stop pair. Only the latest one is kept per Stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

impl Run {
    /// Length of the interval. Zero if the bounds are inverted.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        elapsed_between(self.started_at, self.stopped_at).unwrap_or(Duration::ZERO)
    }
}

/// Non-negative time from `start` to `end`.
fn elapsed_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Duration, TimerFault> {
    end.signed_duration_since(start)
        .to_std()
        .map_err(|_| TimerFault::ClockWentBackwards)
}

// =============================================================================
// TRANSITIONS
// =============================================================================

impl Stage {
    /// `Idle -> Running`, recording `now` as the start instant.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TimerFault> {
        match self.timer {
            TimerState::Running { .. } => Err(TimerFault::AlreadyRunning),
            TimerState::Idle => {
                self.timer = TimerState::Running { started_at: now };
                Ok(())
            }
        }
    }

    /// `Running -> Idle`, returning the length of the interval just closed.
    ///
    /// The interval is added to the accumulated total; the returned value is
    /// the single interval, not the total.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<Duration, TimerFault> {
        let TimerState::Running { started_at } = self.timer else {
            return Err(TimerFault::NotRunning);
        };
        let elapsed = elapsed_between(started_at, now)?;

        self.accumulated = self.accumulated.saturating_add(elapsed);
        self.timer = TimerState::Idle;
        self.last_run = Some(Run {
            started_at,
            stopped_at: now,
        });
        self.completed_runs = self.completed_runs.saturating_add(1);

        Ok(elapsed)
    }

    /// Live length of the open interval, `None` while idle.
    ///
    /// Clamped to zero if the clock has moved behind the start instant.
    #[must_use]
    pub fn running_for(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.timer
            .started_at()
            .map(|started_at| elapsed_between(started_at, now).unwrap_or(Duration::ZERO))
    }
}

// =============================================================================
// TESTS
// =============================================================================
