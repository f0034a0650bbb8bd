//! Last-issued command memory.

/// Remembers the last value passed through and reports whether a new
/// value differs from it.  Starts empty so the first command always
/// goes out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latch<T> {
    last: Option<T>,
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: Copy + PartialEq> Latch<T> {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `value`; returns true if it must be issued.
    pub fn update(&mut self, value: T) -> bool {
        if self.last == Some(value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// Record `value` unconditionally.
    pub fn set(&mut self, value: T) {
        self.last = Some(value);
    }

    /// Forget the last value; the next `update` always issues.
    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<T> {
        self.last
    }
}
