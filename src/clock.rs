//! Wall-clock source for day keys and smoothing windows.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};

/// Anything that can tell the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock. Clones share the same instant, so a test can hand one
/// copy to a governor and keep another to move time forward.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(TimeDelta::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Calendar-day key of `at` under a fixed UTC offset (minutes east).
/// Offsets outside ±24h fall back to UTC.
pub fn day_key(at: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    match offset_minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
        Some(offset) => at.with_timezone(&offset).date_naive(),
        None => at.date_naive(),
    }
}
