//! Parameters structure for TeleopCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use crate::input::AxisMap;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for teleoperation control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Stick deflection below which the demand is zero, in [0, 1).
    pub deadband: f64,

    /// Gain applied to the conditioned speed demand.
    pub speed_gain: f64,

    /// Gain applied to the conditioned turn demand.
    pub turn_gain: f64,

    /// Mapping from raw device axes to speed and turn.
    #[serde(default)]
    pub axis_map: AxisMap
}

impl Default for Params {
    fn default() -> Self {
        Self {
            deadband: 0.07,
            speed_gain: 1.0,
            turn_gain: 0.65,
            axis_map: AxisMap::default()
        }
    }
}
