//! Parameters structure for the pneumatics module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use crate::fault_sup;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the pneumatics module.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Over-current limits, shared by both compressors.
    pub compressor_limit: fault_sup::Params,

    /// How long the cannon valve is held open for one shot.
    ///
    /// Units: seconds
    pub fire_time_s: f64,

    /// Time between toggles of the pressure light while the tanks are full.
    ///
    /// Units: seconds
    pub light_flash_period_s: f64
}

impl Default for Params {
    fn default() -> Self {
        Self {
            compressor_limit: fault_sup::Params {
                threshold_a: 18.0,
                trip_duration_s: 0.5
            },
            fire_time_s: 0.75,
            light_flash_period_s: 1.0
        }
    }
}
