//! # Trajectory control module
//!
//! Replays a time parameterised trajectory. Each cycle the reference state at
//! the elapsed time is looked up, pose feedback corrects the reference
//! chassis velocity, kinematics turns that into wheel speeds and one of the
//! output stages in [`TrajOutputMode`] turns the wheel speeds into motor
//! demands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod feedforward;
mod params;
mod ramsete;
mod state;
mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::PathBuf;

// Internal
pub use comms_if::tc::TrajOutputMode;
pub use feedforward::*;
pub use params::*;
pub use ramsete::*;
pub use state::*;
pub use trajectory::*;
use crate::kinematics::KinematicsError;
use crate::pid::PidGains;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when building a TrajCtrl or loading a
/// trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("The trajectory contains no samples")]
    EmptyTrajectory,

    #[error("Sample {0} of the trajectory is not later than the one before it")]
    NonMonotonicTime(usize),

    #[error("Sample {0} of the trajectory contains a NaN or infinite value")]
    NonFiniteSample(usize),

    #[error("Could not read the trajectory file {0:?}: {1}")]
    TrajectoryLoadError(PathBuf, std::io::Error),

    #[error("Could not parse the trajectory: {0}")]
    TrajectoryParseError(#[from] serde_json::Error),

    #[error("Invalid Ramsete gains b = {0}, zeta = {1} (need b > 0, 0 < zeta < 1)")]
    InvalidRamseteGains(f64, f64),

    #[error("Turn compensation must be finite, got {0}")]
    InvalidTurnCompensation(f64),

    #[error("Feedforward gains must be finite, got {0:?}")]
    InvalidFeedforward(SimpleMotorFeedforward),

    #[error("Wheel PID gains must be finite, got {0:?}")]
    InvalidWheelGains(PidGains),

    #[error("Update period must be positive, got {0} s")]
    InvalidPeriod(f64),

    #[error("Invalid kinematics: {0}")]
    KinematicsError(#[from] KinematicsError),
}
