//! Permanent magnet DC motor feedforward

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use util::maths::sign;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Voltage needed to hold a velocity and acceleration on a simple motor.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct SimpleMotorFeedforward {
    /// Static friction.
    ///
    /// Units: volts
    pub k_s: f64,

    /// Units: volts/(meter/second)
    pub k_v: f64,

    /// Units: volts/(meter/second^2)
    #[serde(default)]
    pub k_a: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimpleMotorFeedforward {
    pub fn new(k_s: f64, k_v: f64, k_a: f64) -> Self {
        Self { k_s, k_v, k_a }
    }

    pub fn is_finite(&self) -> bool {
        self.k_s.is_finite() && self.k_v.is_finite() && self.k_a.is_finite()
    }

    /// Voltage for the given velocity and acceleration.
    pub fn calculate(&self, velocity_ms: f64, accel_mss: f64) -> f64 {
        self.k_s * sign(velocity_ms) + self.k_v * velocity_ms + self.k_a * accel_mss
    }

    /// Velocity the motor settles at under a constant `voltage`.
    ///
    /// Voltages too small to overcome static friction give zero.
    pub fn steady_state_velocity(&self, voltage: f64) -> f64 {
        if voltage.abs() <= self.k_s || self.k_v <= 0.0 {
            0.0
        }
        else {
            (voltage - self.k_s * sign(voltage)) / self.k_v
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
