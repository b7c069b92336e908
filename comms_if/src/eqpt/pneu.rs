//! # Pneumatics Equipment Demands and Sensor Data

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of compressors on the pneumatics system.
pub const NUM_COMPRESSORS: usize = 2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands sent to the pneumatics hardware each cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PneuDems {
    /// Whether each compressor is allowed to run.
    pub compressor_enabled: [bool; NUM_COMPRESSORS],

    /// Whether the cannon valve solenoid is open.
    pub solenoid_open: bool,

    /// Whether the pressure indicator light is on.
    pub light_on: bool
}

/// Sensor data read back from the pneumatics hardware each cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PneuSensData {
    /// Instantaneous current draw of each compressor.
    ///
    /// Units: amps
    pub compressor_current_a: [f64; NUM_COMPRESSORS],

    /// True when the pressure switch reports the tanks are full.
    pub pressure_full: bool
}
