//! # Drivetrain module
//!
//! The drivetrain owns the drive actuators and the single slot for the
//! controller currently allowed to command them. Controllers are handed over
//! explicitly with [`Drivetrain::activate`]; whichever controller loses the
//! drivetrain, whether by being replaced, interrupted, finishing on its own or
//! the drivetrain being dropped, is followed by exactly one stop demand.

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
use comms_if::eqpt::drive::{DriveDems, NeutralMode};
use crate::{
    fo_ctrl::FoCtrlError,
    teleop_ctrl::TeleopCtrlError,
    traj_ctrl::TrajCtrlError
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The actuation layer for the two drive sides.
pub trait DriveSink {
    /// Apply a demand to both sides.
    fn apply(&mut self, dems: DriveDems);

    /// Set what the motors do on a neutral demand.
    fn set_neutral_mode(&mut self, mode: NeutralMode);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors when building a drive controller.
#[derive(Debug, thiserror::Error)]
pub enum DrivetrainError {
    #[error("Could not build the teleop controller: {0}")]
    TeleopCtrlError(#[from] TeleopCtrlError),

    #[error("Could not build the field oriented controller: {0}")]
    FoCtrlError(#[from] FoCtrlError),

    #[error("Could not build the trajectory controller: {0}")]
    TrajCtrlError(#[from] TrajCtrlError),
}
