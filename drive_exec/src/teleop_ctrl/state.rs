//! Implementations for the TeleopCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};

// Internal
use super::{Params, TeleopCtrlError};
use crate::input::{select_live, Deadband, RawInput};
use crate::kinematics::normalise;
use comms_if::eqpt::drive::DriveDems;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Teleoperation control module state
#[derive(Debug, Clone)]
pub struct TeleopCtrl {
    params: Params,

    deadband: Deadband
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeleopCtrl {

    /// Name reported by the drivetrain while this controller is active.
    pub const NAME: &'static str = "teleop";

    pub fn new(params: Params) -> Result<Self, TeleopCtrlError> {
        let deadband = Deadband::new(params.deadband)?;

        if !params.speed_gain.is_finite() {
            return Err(TeleopCtrlError::InvalidGain("speed", params.speed_gain))
        }
        if !params.turn_gain.is_finite() {
            return Err(TeleopCtrlError::InvalidGain("turn", params.turn_gain))
        }

        Ok(Self {
            params,
            deadband
        })
    }

    pub fn activate(&mut self) {
        debug!("TeleopCtrl activated");
    }

    pub fn deactivate(&mut self) {
        debug!("TeleopCtrl deactivated");
    }

    /// Calculate the percent output demand for the given raw speed and turn
    /// axis values.
    pub fn update(&mut self, speed_raw: f64, turn_raw: f64) -> DriveDems {
        let speed = self.deadband.apply(speed_raw) * self.params.speed_gain;
        let turn = self.deadband.apply(turn_raw) * self.params.turn_gain;

        let (left, right) = normalise(speed - turn, speed + turn);

        trace!("TeleopCtrl speed {:.3} turn {:.3} -> ({:.3}, {:.3})",
            speed, turn, left, right);

        DriveDems::PercentOutput { left, right }
    }

    /// Calculate the demand from the first live input source.
    ///
    /// With no live source the demand is zero, so the robot stops if the
    /// operator's device drops out.
    pub fn update_from_inputs(&mut self, inputs: &[RawInput]) -> DriveDems {
        let (speed_raw, turn_raw) = match select_live(inputs) {
            Some(input) => self.params.axis_map.read(input),
            None => (0.0, 0.0)
        };

        self.update(speed_raw, turn_raw)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
