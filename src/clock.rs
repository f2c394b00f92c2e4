//! Time source for session timestamps.

use std::cell::Cell;

/// Supplies the current time as epoch milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        jiff::Timestamp::now().as_millisecond()
    }
}

/// A clock that only moves when told to.
///
/// Each reading returns the current value and then advances by `step`,
/// so consecutive events get distinct, predictable timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
    step: i64,
}

impl ManualClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }

    /// Moves the clock forward without taking a reading.
    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
