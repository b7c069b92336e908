//! # Drive library.
//!
//! Motion control for a differential drive robot, plus the pneumatics
//! subsystem it carries. This library allows other crates in the workspace
//! (and the `drive_exec` binary) to access items defined inside the drive
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - the shared state of the executable for one cycle
pub mod data_store;

/// Drivetrain - arbitrates which controller commands the drive actuators
pub mod drivetrain;

/// Current fault supervision - trips actuators drawing too much current for too long
pub mod fault_sup;

/// Field oriented control - drives along a field relative velocity vector
pub mod fo_ctrl;

/// Input conditioning - joystick deadband and axis selection
pub mod input;

/// Differential drive kinematics and demand normalisation
pub mod kinematics;

/// Localisation types - robot pose and rigid body operations
pub mod loc;

/// PID controller
pub mod pid;

/// Pneumatics - compressors, cannon valve and pressure light
pub mod pneumatics;

/// Simulated drivetrain and pneumatics
pub mod sim;

/// Telecommand processor - executes drive telecommands against the data store
pub mod tc_processor;

/// Teleoperation control - drives from operator sticks
pub mod teleop_ctrl;

/// Trajectory control - keeps the robot on a time parameterised trajectory
pub mod traj_ctrl;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default control period.
///
/// Units: seconds
pub const DEFAULT_PERIOD_S: f64 = 0.02;
