//! PID correction term
//!
//! Proportional-integral-derivative computation over a fixed tick
//! interval.  The caller supplies the signed error directly (for the
//! climber that is the negated chassis pitch) and adds the output to
//! whatever open-loop command it is already issuing.
//!
//! Output is not clamped; the actuator limits downstream saturate it.
//! The owning state resets the controller on entry and exit so the
//! integral never carries between activations.

pub use crate::config::PidGains;

/// PID correction with a fixed `dt`.
#[derive(Debug, Clone)]
pub struct PidCorrection {
    gains: PidGains,
    dt: f64,
    error: f64,
    previous_error: f64,
    /// Accumulated `error * dt`
    integral: f64,
    output: f64,
}

impl PidCorrection {
    pub fn new(gains: PidGains, dt: f64) -> Self {
        Self {
            gains,
            dt,
            error: 0.0,
            previous_error: 0.0,
            integral: 0.0,
            output: 0.0,
        }
    }

    /// Compute the correction for this tick's error.  Call at most once
    /// per tick; every call integrates.
    pub fn update(&mut self, error: f64) -> f64 {
        self.previous_error = self.error;
        self.error = error;
        self.integral += error * self.dt;

        let p = self.gains.kp * error;
        let i = self.gains.ki * self.integral;
        let d = if self.dt > 0.0 {
            self.gains.kd * (error - self.previous_error) / self.dt
        } else {
            0.0
        };

        self.output = p + i + d;
        self.output
    }

    /// Zero every accumulated term.
    pub fn reset(&mut self) {
        self.error = 0.0;
        self.previous_error = 0.0;
        self.integral = 0.0;
        self.output = 0.0;
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    /// Error change since the previous tick.
    pub fn delta_error(&self) -> f64 {
        self.error - self.previous_error
    }

    /// Error change per second over the last tick.
    pub fn error_rate(&self) -> f64 {
        if self.dt > 0.0 {
            self.delta_error() / self.dt
        } else {
            0.0
        }
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn output(&self) -> f64 {
        self.output
    }
}
