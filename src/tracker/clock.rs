use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};

// ---------------------------------------------------------------------------
// Wall-clock sources
// ---------------------------------------------------------------------------

/// Source of wall-clock time for remaining-time queries.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The host's real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same current time, so a handle
/// kept by the caller drives a tracker that owns another clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        self.now.set(time);
    }

    /// Move the clock forward by `seconds` (backward if negative).
    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds_to_delta(seconds));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// Conversions between float seconds and chrono deltas
// ---------------------------------------------------------------------------

/// Float seconds to a delta with microsecond resolution.
pub fn seconds_to_delta(seconds: f64) -> TimeDelta {
    TimeDelta::microseconds((seconds * 1e6).round() as i64)
}

/// Delta to float seconds.
pub fn delta_seconds(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(us) => us as f64 * 1e-6,
        None => delta.num_milliseconds() as f64 * 1e-3,
    }
}
