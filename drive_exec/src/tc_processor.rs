//! # Telecommand processor module
//!
//! The telecommand processor handles drive TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use thiserror::Error;

// Internal
use comms_if::tc::DriveTc;
use crate::{
    data_store::DataStore,
    drivetrain::{DriveCtrl, DriveSink, DrivetrainError},
    input::RawInput,
    loc::Pose,
    pneumatics::PneumaticsError,
    traj_ctrl::{TrajCtrlError, Trajectory}
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a telecommand could not be executed.
#[derive(Debug, Error)]
pub enum TcProcError {
    #[error("{0}")]
    DrivetrainError(#[from] DrivetrainError),

    #[error("{0}")]
    TrajectoryError(#[from] TrajCtrlError),

    #[error("{0}")]
    PneumaticsError(#[from] PneumaticsError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. A TC which
/// fails leaves the datastore as it was.
pub fn exec<S: DriveSink>(ds: &mut DataStore<S>, tc: &DriveTc) -> Result<(), TcProcError> {

    // Handle different Tcs
    match tc {
        DriveTc::Teleop => {
            debug!("Recieved Teleop command");
            let ctrl = DriveCtrl::teleop(&ds.drive_params)?;
            ds.drivetrain.activate(ctrl);
        },
        DriveTc::FieldOriented => {
            debug!("Recieved FieldOriented command");
            let ctrl = DriveCtrl::field_oriented(&ds.drive_params, ds.period_s)?;
            ds.drivetrain.activate(ctrl);
        },
        DriveTc::FollowTrajectory { path, mode, zero_pose } => {
            let full_path = ds.traj_dir.join(path);
            debug!("Recieved FollowTrajectory command for {:?}", full_path);

            let trajectory = Trajectory::load(&full_path)?;
            info!(
                "Loaded trajectory of {} samples lasting {:.2} s",
                trajectory.samples().len(),
                trajectory.total_time_s()
            );

            let ctrl = DriveCtrl::trajectory(
                &ds.drive_params,
                ds.period_s,
                &trajectory,
                *mode,
                (*zero_pose).map(Pose::from)
            )?;
            ds.drivetrain.activate(ctrl);
        },
        DriveTc::Stop => {
            debug!("Recieved Stop command");
            ds.drivetrain.deactivate();
        },
        DriveTc::Axes { axes } => {
            ds.drive_input.raw_inputs = vec![RawInput {
                live: true,
                axes: axes.clone()
            }];
        },
        DriveTc::FieldVelocity { vx_ms, vy_ms } => {
            ds.drive_input.field_vel_ms = Some(nalgebra::Vector2::new(*vx_ms, *vy_ms));
        },
        DriveTc::EnableCompressors => ds.pneumatics.enable_compressors(),
        DriveTc::DisableCompressors => ds.pneumatics.disable_compressors(),
        DriveTc::Fire => ds.pneumatics.fire()?,
        DriveTc::ResetFaults => {
            info!("Resetting compressor faults");
            ds.pneumatics.reset_faults();
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
