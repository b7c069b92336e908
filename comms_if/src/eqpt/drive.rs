//! # Drive Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand for the two sides of the drivetrain.
///
/// Each variant is one of the output modes accepted by the motor controllers. Left always comes
/// first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriveDems {
    /// Open loop percent output, each side in [-1, 1].
    PercentOutput {
        left: f64,
        right: f64
    },

    /// Motor voltage demand.
    ///
    /// Units: volts
    Voltage {
        left_v: f64,
        right_v: f64
    },

    /// Wheel velocity setpoints, regulated on board the motor controllers.
    ///
    /// Units: meters/second
    Velocity {
        left_ms: f64,
        right_ms: f64
    },

    /// Put both sides into their neutral state (coast or brake, as configured).
    Neutral
}

/// What the motor controllers do with a neutral demand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralMode {
    /// Motors freewheel.
    Coast,

    /// Motor leads are shorted, actively resisting motion.
    Brake
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveDems {
    /// True if the demand is a neutral (stop) demand.
    pub fn is_neutral(&self) -> bool {
        matches!(self, DriveDems::Neutral)
    }

    /// The (left, right) values carried by the demand, zero for neutral.
    pub fn sides(&self) -> (f64, f64) {
        match *self {
            DriveDems::PercentOutput { left, right } => (left, right),
            DriveDems::Voltage { left_v, right_v } => (left_v, right_v),
            DriveDems::Velocity { left_ms, right_ms } => (left_ms, right_ms),
            DriveDems::Neutral => (0.0, 0.0)
        }
    }
}

impl Default for NeutralMode {
    fn default() -> Self {
        NeutralMode::Brake
    }
}
