//! Timed waits without sleeping.
//!
//! A wait is a recorded start timestamp plus a duration.  Guards compare
//! the clock against it on later ticks.  A state arms its own wait on
//! entry so a stale timestamp from an earlier visit cannot leak in.
//!
//! Timestamps arrive as `f64` seconds but are compared as whole
//! microseconds.  `0.35 - 0.1` is just under `0.25` in floating point, and
//! a wait must still fire on the first tick that reaches its duration.

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Seconds to the nearest microsecond.
fn to_micros(secs: f64) -> i64 {
    (secs * MICROS_PER_SEC).round() as i64
}

fn to_secs(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SEC
}

/// A start timestamp and a duration, held in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedWait {
    start_us: i64,
    duration_us: i64,
}

impl TimedWait {
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start_us: to_micros(start),
            duration_us: to_micros(duration),
        }
    }

    /// True once `now - start >= duration`, to the microsecond.
    pub fn elapsed(&self, now: f64) -> bool {
        to_micros(now) - self.start_us >= self.duration_us
    }

    pub fn deadline(&self) -> f64 {
        to_secs(self.start_us + self.duration_us)
    }

    /// Seconds left, never negative.
    pub fn remaining(&self, now: f64) -> f64 {
        to_secs((self.start_us + self.duration_us - to_micros(now)).max(0))
    }
}
