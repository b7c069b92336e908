//! Trajectory control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::kinematics::{ChassisVelocity, DiffDriveKinematics, WheelSpeeds};
use crate::loc::Pose;
use crate::pid::PidController;
use comms_if::eqpt::drive::DriveDems;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory control module state, for one traversal of one trajectory.
#[derive(Debug, Clone)]
pub struct TrajCtrl {
    /// The trajectory, already expressed relative to the zero pose
    trajectory: Trajectory,

    mode: TrajOutputMode,

    feedback: PoseFeedback,
    kinematics: DiffDriveKinematics,
    feedforward: SimpleMotorFeedforward,

    /// Per side wheel speed controllers
    left_pid: PidController,
    right_pid: PidController,

    turn_compensation: f64,

    /// Control period
    ///
    /// Units: seconds
    period_s: f64,

    /// Number of updates performed since activation
    num_ticks: u64,

    /// Wheel speed targets from the previous update, used to find the
    /// acceleration feedforward
    prev_target: WheelSpeeds,

    report: StatusReport
}

/// The status report containing monitoring quantities and error flags.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Time along the trajectory of the last update.
    ///
    /// Units: seconds
    pub elapsed_s: f64,

    /// Wheel speed targets after pose feedback.
    pub target_left_ms: f64,
    pub target_right_ms: f64,

    /// Distance between the reference and measured positions.
    ///
    /// Units: meters
    pub position_error_m: f64,

    /// Units: radians
    pub heading_error_rad: f64,

    /// The pose was missing or not finite and zero was used instead.
    pub stale_pose: bool,

    /// The wheel speeds were missing or not finite and zero was used
    /// instead.
    pub stale_wheel_speeds: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajCtrl {

    /// Name reported by the drivetrain while this controller is active.
    pub const NAME: &'static str = "trajectory";

    /// Prepare to follow `trajectory`.
    ///
    /// The trajectory is re-expressed relative to `zero_pose`, or to its own
    /// initial pose if none is given, so that it starts where odometry was
    /// zeroed.
    pub fn new(
        params: &Params,
        period_s: f64,
        trajectory: &Trajectory,
        mode: TrajOutputMode,
        zero_pose: Option<Pose>
    ) -> Result<Self, TrajCtrlError> {
        // Gains are checked even when feedback is disabled
        let ramsete = Ramsete::new(params.ramsete_b, params.ramsete_zeta)?;

        let feedback = match mode {
            TrajOutputMode::FeedforwardOnly => PoseFeedback::Disabled,
            _ => PoseFeedback::Ramsete(ramsete)
        };

        if !params.turn_compensation.is_finite() {
            return Err(TrajCtrlError::InvalidTurnCompensation(
                params.turn_compensation
            ))
        }
        if !params.feedforward.is_finite() {
            return Err(TrajCtrlError::InvalidFeedforward(params.feedforward))
        }
        if !params.wheel_pid.is_finite() {
            return Err(TrajCtrlError::InvalidWheelGains(params.wheel_pid))
        }
        if !(period_s.is_finite() && period_s > 0.0) {
            return Err(TrajCtrlError::InvalidPeriod(period_s))
        }

        let zero_pose = zero_pose.unwrap_or_else(|| trajectory.initial_pose());

        Ok(Self {
            trajectory: trajectory.relative_to(&zero_pose),
            mode,
            feedback,
            kinematics: DiffDriveKinematics::new(params.track_width_m)?,
            feedforward: params.feedforward,
            left_pid: PidController::new(params.wheel_pid, period_s),
            right_pid: PidController::new(params.wheel_pid, period_s),
            turn_compensation: params.turn_compensation,
            period_s,
            num_ticks: 0,
            prev_target: WheelSpeeds::default(),
            report: StatusReport::default()
        })
    }

    /// Start (or restart) the traversal from time zero.
    pub fn activate(&mut self) {
        self.num_ticks = 0;
        self.left_pid.reset();
        self.right_pid.reset();
        self.report = StatusReport::default();

        let initial = self.trajectory.sample(0.0);
        self.prev_target = self.kinematics.to_wheel_speeds(&ChassisVelocity {
            linear_ms: initial.velocity_ms,
            angular_rads: initial.angular_velocity_rads()
        });

        debug!(
            "TrajCtrl activated: {:?} over {:.2} s",
            self.mode, self.trajectory.total_time_s()
        );
    }

    pub fn deactivate(&mut self) {
        debug!("TrajCtrl deactivated at {:.2} s", self.elapsed_s());
    }

    /// Time along the trajectory of the next update.
    ///
    /// Units: seconds
    pub fn elapsed_s(&self) -> f64 {
        self.num_ticks as f64 * self.period_s
    }

    /// True once the elapsed time has passed the end of the trajectory.
    pub fn is_finished(&self) -> bool {
        self.elapsed_s() > self.trajectory.total_time_s()
    }

    /// Calculate the drive demands for this cycle.
    ///
    /// Missing or non-finite measurements are replaced with zero. Returns
    /// `None` once the trajectory is finished.
    pub fn update(
        &mut self,
        pose: Option<Pose>,
        wheel_speeds: Option<WheelSpeeds>
    ) -> Option<DriveDems> {
        if self.is_finished() {
            return None
        }

        let time_s = self.elapsed_s();
        let pose = self.valid_pose(pose);
        let reference = self.trajectory.sample(time_s);

        let chassis = self.feedback.calculate(
            &pose,
            &reference.pose,
            reference.velocity_ms,
            reference.angular_velocity_rads()
        );
        let target = self.kinematics.to_wheel_speeds(&chassis);

        let dems = match self.mode {
            TrajOutputMode::VelocityLocal => DriveDems::Velocity {
                left_ms: target.left_ms,
                right_ms: target.right_ms
            },
            TrajOutputMode::FeedforwardVoltage | TrajOutputMode::FeedforwardOnly => {
                let mut left_v = self.feedforward.calculate(
                    target.left_ms,
                    (target.left_ms - self.prev_target.left_ms) / self.period_s
                );
                let mut right_v = self.feedforward.calculate(
                    target.right_ms,
                    (target.right_ms - self.prev_target.right_ms) / self.period_s
                );

                if self.mode == TrajOutputMode::FeedforwardVoltage {
                    let measured = self.valid_wheel_speeds(wheel_speeds);
                    left_v += self.left_pid.calculate(measured.left_ms, target.left_ms);
                    right_v += self.right_pid.calculate(measured.right_ms, target.right_ms);
                }

                let comp = (right_v - left_v) * self.turn_compensation;

                DriveDems::Voltage {
                    left_v: left_v - comp,
                    right_v: right_v + comp
                }
            }
        };

        self.report.elapsed_s = time_s;
        self.report.target_left_ms = target.left_ms;
        self.report.target_right_ms = target.right_ms;
        self.report.position_error_m = reference.pose.distance_to(&pose);
        self.report.heading_error_rad = reference.pose.relative_to(&pose).heading_rad;

        trace!("TrajCtrl t = {:.2} s, target {:?}, {:?}", time_s, target, dems);

        self.prev_target = target;
        self.num_ticks += 1;

        Some(dems)
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    fn valid_pose(&mut self, pose: Option<Pose>) -> Pose {
        match pose {
            Some(p) if p.is_finite() => {
                self.report.stale_pose = false;
                p
            },
            _ => {
                if !self.report.stale_pose {
                    warn!("TrajCtrl has no valid pose, using zero until one arrives");
                }
                self.report.stale_pose = true;
                Pose::default()
            }
        }
    }

    fn valid_wheel_speeds(&mut self, speeds: Option<WheelSpeeds>) -> WheelSpeeds {
        match speeds {
            Some(s) if s.is_finite() => {
                self.report.stale_wheel_speeds = false;
                s
            },
            _ => {
                if !self.report.stale_wheel_speeds {
                    warn!("TrajCtrl has no valid wheel speeds, using zero until they arrive");
                }
                self.report.stale_wheel_speeds = true;
                WheelSpeeds::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
