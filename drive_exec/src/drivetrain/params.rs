//! Parameters structure for the drivetrain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use comms_if::eqpt::drive::NeutralMode;
use crate::{fo_ctrl, teleop_ctrl, traj_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the drivetrain and the controllers that can drive it.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    /// Behaviour of the motors on a stop demand.
    #[serde(default)]
    pub neutral_mode: NeutralMode,

    pub teleop: teleop_ctrl::Params,

    pub field_oriented: fo_ctrl::Params,

    pub trajectory: traj_ctrl::Params
}
