//! Parameters structure for TrajCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::{Ramsete, SimpleMotorFeedforward};
use crate::pid::PidGains;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- DRIVETRAIN MODEL ----

    /// Distance between the left and right wheels.
    ///
    /// Units: meters
    pub track_width_m: f64,

    /// Motor feedforward of one side of the drivetrain.
    pub feedforward: SimpleMotorFeedforward,

    // ---- FEEDBACK ----

    /// Ramsete convergence gain.
    #[serde(default = "default_b")]
    pub ramsete_b: f64,

    /// Ramsete damping gain.
    #[serde(default = "default_zeta")]
    pub ramsete_zeta: f64,

    /// Gains of the per side wheel speed controllers. Input is wheel speed in
    /// meters/second, output is volts added to the feedforward.
    pub wheel_pid: PidGains,

    /// Fraction of the right minus left voltage difference added to the
    /// right side and removed from the left, countering coupling between the
    /// two sides. Zero for a perfectly decoupled drivetrain.
    #[serde(default)]
    pub turn_compensation: f64
}

fn default_b() -> f64 {
    Ramsete::DEFAULT_B
}

fn default_zeta() -> f64 {
    Ramsete::DEFAULT_ZETA
}
