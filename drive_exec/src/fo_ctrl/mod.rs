//! Field oriented control module
//!
//! Drives the robot along a velocity vector given in the field frame. The
//! robot turns to face along the vector using a heading PID loop while the
//! component of the vector along its current heading drives it forwards.

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
use crate::kinematics::KinematicsError;
use crate::pid::PidGains;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a FoCtrl.
#[derive(Debug, thiserror::Error)]
pub enum FoCtrlError {
    #[error("Maximum velocity must be positive, got {0} m/s")]
    InvalidMaxVelocity(f64),

    #[error("Heading PID gains must be finite, got {0:?}")]
    InvalidHeadingGains(PidGains),

    #[error("Update period must be positive, got {0} s")]
    InvalidPeriod(f64),

    #[error("Invalid kinematics: {0}")]
    KinematicsError(#[from] KinematicsError),
}
