//! Robot configuration parameters
//!
//! All tunable parameters for the hatch, hatch deploy and climber
//! subsystems.  Defaults are the values tuned on the practice robot.
//! A JSON document can override any subset of them; missing fields keep
//! their defaults.  Every subsystem re-validates its section at
//! construction and refuses to build on a bad value.

use serde::{Deserialize, Serialize};

use crate::app::ports::NeutralMode;
use crate::error::{ConfigError, Result};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Fixed control loop period (seconds)
    pub loop_period_secs: f64,
    pub hatch: HatchConfig,
    pub hatch_deploy: HatchDeployConfig,
    pub climber: ClimberConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            loop_period_secs: 0.01, // 100 Hz
            hatch: HatchConfig::default(),
            hatch_deploy: HatchDeployConfig::default(),
            climber: ClimberConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        check_period(self.loop_period_secs, "loop_period_secs")?;
        self.hatch.validate()?;
        self.hatch_deploy.validate()?;
        self.climber.validate()
    }
}

// ---------------------------------------------------------------------------
// Hatch grabber
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchConfig {
    /// Grabber open delay after the grab button is released (seconds)
    pub grab_delay_secs: f64,
    /// Grabber close delay before the arm retracts (seconds)
    pub release_delay_secs: f64,
}

impl Default for HatchConfig {
    fn default() -> Self {
        Self {
            grab_delay_secs: 0.25,
            release_delay_secs: 0.25,
        }
    }
}

impl HatchConfig {
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        check_duration(self.grab_delay_secs, "hatch.grab_delay_secs")?;
        check_duration(self.release_delay_secs, "hatch.release_delay_secs")
    }
}

// ---------------------------------------------------------------------------
// Hatch deploy arm
// ---------------------------------------------------------------------------

/// Positions are in encoder units of the arm's relative magnetic encoder
/// (4096 per revolution), zeroed against the reverse limit switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchDeployConfig {
    /// Open-loop output while driving into the reverse limit
    pub zeroing_percent_output: f64,
    pub bumper_position: f64,
    pub collision_position: f64,
    pub human_station_position: f64,
    pub ground_position: f64,
    pub defense_position: f64,
    /// How long a ground excursion lasts before returning to the bumper (seconds)
    pub ground_dwell_secs: f64,
    /// How long a human-station excursion lasts (seconds)
    pub human_station_dwell_secs: f64,
    pub motor_inverted: bool,
    pub neutral_mode: NeutralMode,
}

impl Default for HatchDeployConfig {
    fn default() -> Self {
        Self {
            zeroing_percent_output: -0.15,
            bumper_position: 275.0,
            collision_position: 400.0,
            human_station_position: 400.0,
            ground_position: 1249.0,
            defense_position: 0.0,
            ground_dwell_secs: 1.0,
            human_station_dwell_secs: 0.5,
            motor_inverted: true,
            neutral_mode: NeutralMode::Brake,
        }
    }
}

impl HatchDeployConfig {
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        check_percent(self.zeroing_percent_output, "hatch_deploy.zeroing_percent_output")?;
        if self.zeroing_percent_output >= 0.0 {
            // Zeroing must drive toward the reverse limit.
            return Err(ConfigError::Invalid("hatch_deploy.zeroing_percent_output"));
        }
        for (value, name) in [
            (self.bumper_position, "hatch_deploy.bumper_position"),
            (self.collision_position, "hatch_deploy.collision_position"),
            (self.human_station_position, "hatch_deploy.human_station_position"),
            (self.ground_position, "hatch_deploy.ground_position"),
            (self.defense_position, "hatch_deploy.defense_position"),
        ] {
            check_finite(value, name)?;
        }
        check_duration(self.ground_dwell_secs, "hatch_deploy.ground_dwell_secs")?;
        check_duration(self.human_station_dwell_secs, "hatch_deploy.human_station_dwell_secs")
    }
}

// ---------------------------------------------------------------------------
// Climber
// ---------------------------------------------------------------------------

/// Proportional / integral / derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn validate(&self, name: &'static str) -> core::result::Result<(), ConfigError> {
        for gain in [self.kp, self.ki, self.kd] {
            if !gain.is_finite() || gain < 0.0 {
                return Err(ConfigError::Invalid(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    /// Drive base output while creeping onto the platform
    pub drive_percent_output: f64,
    /// Climber wheel output while the cylinders extend
    pub climb_motor_extending_percent_output: f64,
    /// Climber wheel output once the robot is at the top
    pub climb_motor_at_top_percent_output: f64,
    /// Dwell after the retract press before the last nudge (seconds)
    pub retract_dwell_secs: f64,
    /// Length of the last nudge (seconds)
    pub last_nudge_secs: f64,
    /// Arm angle at or below which the climb is considered down (degrees)
    pub arm_ground_angle_deg: f64,
    /// Tilt correction: error is the negated chassis pitch in degrees
    pub tilt_gains: PidGains,
    pub motor_inverted: bool,
    pub neutral_mode: NeutralMode,
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self {
            drive_percent_output: 0.2,
            climb_motor_extending_percent_output: 0.2,
            climb_motor_at_top_percent_output: 0.4,
            retract_dwell_secs: 2.0,
            last_nudge_secs: 0.5,
            arm_ground_angle_deg: 0.0,
            tilt_gains: PidGains::new(0.01, 0.0, 0.0),
            motor_inverted: false,
            neutral_mode: NeutralMode::Brake,
        }
    }
}

impl ClimberConfig {
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        check_percent(self.drive_percent_output, "climber.drive_percent_output")?;
        check_percent(
            self.climb_motor_extending_percent_output,
            "climber.climb_motor_extending_percent_output",
        )?;
        check_percent(
            self.climb_motor_at_top_percent_output,
            "climber.climb_motor_at_top_percent_output",
        )?;
        check_duration(self.retract_dwell_secs, "climber.retract_dwell_secs")?;
        check_duration(self.last_nudge_secs, "climber.last_nudge_secs")?;
        check_finite(self.arm_ground_angle_deg, "climber.arm_ground_angle_deg")?;
        self.tilt_gains.validate("climber.tilt_gains")
    }
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

fn check_finite(value: f64, name: &'static str) -> core::result::Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(name))
    }
}

fn check_period(value: f64, name: &'static str) -> core::result::Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(name))
    }
}

fn check_duration(value: f64, name: &'static str) -> core::result::Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(name))
    }
}

fn check_percent(value: f64, name: &'static str) -> core::result::Result<(), ConfigError> {
    if value.is_finite() && (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(name))
    }
}
