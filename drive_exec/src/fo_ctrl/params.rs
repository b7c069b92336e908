//! Parameters structure for FoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use crate::pid::PidGains;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for field oriented control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Neither side is ever demanded faster than this.
    ///
    /// Units: meters/second
    pub max_velocity_ms: f64,

    /// Distance between the left and right wheels.
    ///
    /// Units: meters
    pub track_width_m: f64,

    /// Gains of the heading controller. Input is heading error in radians,
    /// output is angular velocity in radians/second.
    pub heading_pid: PidGains
}
