//! # Telecommand module
//!
//! Telecommands are the instructions given to the drive executable by whatever is scheduling it
//! (an operator script, a ground station). They are encoded as externally tagged JSON, for
//! example:
//!
//! ```json
//! "Teleop"
//! {"FieldVelocity": {"vx_ms": 1.0, "vy_ms": 0.0}}
//! {"FollowTrajectory": {"path": "s_curve.json", "mode": "FeedforwardVoltage", "zero_pose": null}}
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand to the drive executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DriveTc {
    /// Hand the drivetrain to the teleoperation controller.
    Teleop,

    /// Hand the drivetrain to the field oriented controller.
    FieldOriented,

    /// Follow the trajectory stored in the given file (relative to the trajectories directory).
    FollowTrajectory {
        path: PathBuf,

        /// How the follower turns wheel speeds into motor demands.
        mode: TrajOutputMode,

        /// Pose (x meters, y meters, heading radians) the trajectory is re-expressed relative to.
        /// If `None` the trajectory's own initial pose is used.
        zero_pose: Option<[f64; 3]>
    },

    /// Interrupt whichever controller has the drivetrain, bringing it to a stop.
    Stop,

    /// Raw joystick axes, as read from the input device.
    Axes {
        axes: Vec<f64>
    },

    /// Desired field relative velocity for the field oriented controller.
    FieldVelocity {
        vx_ms: f64,
        vy_ms: f64
    },

    /// Allow both compressors to run.
    EnableCompressors,

    /// Stop both compressors.
    DisableCompressors,

    /// Fire the cannon.
    Fire,

    /// Re-arm any tripped compressor current supervisors.
    ResetFaults
}

/// Output stage of the trajectory follower.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajOutputMode {
    /// Pose feedback, motor feedforward voltages, per side wheel speed PID and trim compensation.
    FeedforwardVoltage,

    /// Pose feedback, wheel speed setpoints regulated by the motor controllers.
    VelocityLocal,

    /// No pose feedback or wheel speed PID, motor feedforward voltages only.
    FeedforwardOnly
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveTc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str.trim()).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unit_tc() {
        assert_eq!(DriveTc::from_json("\"Teleop\"").unwrap(), DriveTc::Teleop);
        assert_eq!(DriveTc::from_json(" \"Fire\" ").unwrap(), DriveTc::Fire);
    }

    #[test]
    fn test_follow_tc() {
        let tc = DriveTc::from_json(
            r#"{"FollowTrajectory": {"path": "s_curve.json", "mode": "VelocityLocal", "zero_pose": [1.0, 2.0, 0.0]}}"#
        ).unwrap();

        assert_eq!(tc, DriveTc::FollowTrajectory {
            path: PathBuf::from("s_curve.json"),
            mode: TrajOutputMode::VelocityLocal,
            zero_pose: Some([1.0, 2.0, 0.0])
        });
    }

    #[test]
    fn test_invalid_tc() {
        assert!(matches!(
            DriveTc::from_json("{\"Warp\": 9}"),
            Err(TcParseError::InvalidJson(_))
        ));
    }
}
