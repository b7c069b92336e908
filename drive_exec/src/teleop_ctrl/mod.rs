//! Teleoperation control module
//!
//! Drives the robot directly from a human's speed and turn sticks, in open
//! loop percent output.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
use crate::input::InputError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a TeleopCtrl.
#[derive(Debug, thiserror::Error)]
pub enum TeleopCtrlError {
    #[error("Invalid deadband: {0}")]
    InvalidDeadband(#[from] InputError),

    #[error("The {0} gain must be finite, got {1}")]
    InvalidGain(&'static str, f64),
}
