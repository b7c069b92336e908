//! # PID controller
//!
//! Fixed period PID regulator used for heading control in the field oriented
//! controller and for per side wheel speed control in the trajectory
//! follower.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains for a PID controller, as they appear in parameter files.
#[derive(Debug, Copy, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PidGains {
    pub k_p: f64,

    #[serde(default)]
    pub k_i: f64,

    #[serde(default)]
    pub k_d: f64
}

/// A PID controller
#[derive(Debug, Clone, Serialize)]
pub struct PidController {
    gains: PidGains,

    /// Period between calls to `calculate`.
    ///
    /// Units: seconds
    period_s: f64,

    /// Previous error, `None` straight after a reset
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,

    /// Last setpoint passed in
    setpoint: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidGains {
    /// True if every gain is a finite number.
    pub fn is_finite(&self) -> bool {
        self.k_p.is_finite() && self.k_i.is_finite() && self.k_d.is_finite()
    }
}

impl PidController {

    /// Create a new controller with the given gains, called every `period_s`.
    pub fn new(gains: PidGains, period_s: f64) -> Self {
        Self {
            gains,
            period_s,
            prev_error: None,
            integral: 0f64,
            setpoint: 0f64
        }
    }

    /// Get the output of the controller driving `measurement` towards
    /// `setpoint`.
    pub fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64 {
        self.setpoint = setpoint;
        let error = setpoint - measurement;

        self.integral += error * self.period_s;

        // No derivative on the first sample, otherwise the step from zero
        // produces a large spike.
        let deriv = match self.prev_error {
            Some(e) => (error - e) / self.period_s,
            None => 0f64
        };

        self.prev_error = Some(error);

        self.gains.k_p * error
            + self.gains.k_i * self.integral
            + self.gains.k_d * deriv
    }

    /// Clear the integral and derivative history.
    pub fn reset(&mut self) {
        self.prev_error = None;
        self.integral = 0f64;
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
