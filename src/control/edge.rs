//! Edge detection on level-based inputs
//!
//! Buttons and thresholded axes arrive as levels sampled once per tick.
//! State guards want events: "pressed this tick", "released this tick".
//! An [`EdgeDetector`] keeps the previous sample and reports a one-tick
//! pulse when the level changes in its configured direction.
//!
//! The first sample only primes the detector.  A button already held
//! when the detector is created does not count as a press.

/// Which level change the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// false -> true
    Rising,
    /// true -> false
    Falling,
}

/// One-direction edge detector.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    edge: Edge,
    /// `None` until the first sample arrives.
    previous: Option<bool>,
}

impl EdgeDetector {
    pub const fn new(edge: Edge) -> Self {
        Self {
            edge,
            previous: None,
        }
    }

    pub const fn rising() -> Self {
        Self::new(Edge::Rising)
    }

    pub const fn falling() -> Self {
        Self::new(Edge::Falling)
    }

    /// Feed this tick's level.  Call exactly once per tick.
    pub fn update(&mut self, level: bool) -> bool {
        let fired = match (self.previous, self.edge) {
            (None, _) => false,
            (Some(prev), Edge::Rising) => !prev && level,
            (Some(prev), Edge::Falling) => prev && !level,
        };
        self.previous = Some(level);
        fired
    }

    /// Forget the stored sample; the next `update` primes again.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Press and release detection for the same input.
///
/// Sharing one previous sample keeps the two events consistent: a
/// release can only be reported after a level that was seen high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    previous: Option<bool>,
}

/// Events produced by one [`ButtonEdges::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeEvents {
    pub level: bool,
    pub pressed: bool,
    pub released: bool,
}

impl ButtonEdges {
    pub const fn new() -> Self {
        Self { previous: None }
    }

    pub fn update(&mut self, level: bool) -> EdgeEvents {
        let events = match self.previous {
            None => EdgeEvents {
                level,
                ..EdgeEvents::default()
            },
            Some(prev) => EdgeEvents {
                level,
                pressed: !prev && level,
                released: prev && !level,
            },
        };
        self.previous = Some(level);
        events
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}
