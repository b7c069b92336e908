//! Implementations for the Drivetrain state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{DriveSink, DrivetrainError, Params};
use crate::{
    fo_ctrl::FoCtrl,
    input::RawInput,
    kinematics::WheelSpeeds,
    loc::Pose,
    teleop_ctrl::TeleopCtrl,
    traj_ctrl::{TrajCtrl, TrajOutputMode, Trajectory}
};
use comms_if::eqpt::drive::{DriveDems, NeutralMode};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drivetrain module state
pub struct Drivetrain<S: DriveSink> {
    sink: S,

    neutral_mode: NeutralMode,

    /// The controller with exclusive use of the sink, if any
    active: Option<DriveCtrl>
}

/// Input data to the drivetrain, as measured or commanded this cycle.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Operator input devices in priority order.
    pub raw_inputs: Vec<RawInput>,

    /// Field relative velocity demand for field oriented control.
    ///
    /// Units: meters/second
    pub field_vel_ms: Option<Vector2<f64>>,

    /// Current pose from odometry.
    pub pose: Option<Pose>,

    /// Measured speed of each side.
    pub wheel_speeds: Option<WheelSpeeds>
}

/// Status report for drivetrain processing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Name of the controller which had the drivetrain this cycle.
    pub activity: &'static str,

    /// True if the controller finished this cycle and was stopped.
    pub finished: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A controller able to take the drivetrain, carrying its own state.
#[derive(Debug, Clone)]
pub enum DriveCtrl {
    Teleop(TeleopCtrl),
    FieldOriented(FoCtrl),
    Trajectory(TrajCtrl)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {

    /// Build a teleop controller.
    pub fn teleop(params: &Params) -> Result<Self, DrivetrainError> {
        Ok(DriveCtrl::Teleop(TeleopCtrl::new(params.teleop.clone())?))
    }

    /// Build a field oriented controller.
    pub fn field_oriented(params: &Params, period_s: f64) -> Result<Self, DrivetrainError> {
        Ok(DriveCtrl::FieldOriented(FoCtrl::new(&params.field_oriented, period_s)?))
    }

    /// Build a trajectory controller for the given trajectory.
    pub fn trajectory(
        params: &Params,
        period_s: f64,
        trajectory: &Trajectory,
        mode: TrajOutputMode,
        zero_pose: Option<Pose>
    ) -> Result<Self, DrivetrainError> {
        Ok(DriveCtrl::Trajectory(TrajCtrl::new(
            &params.trajectory, period_s, trajectory, mode, zero_pose
        )?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DriveCtrl::Teleop(_) => TeleopCtrl::NAME,
            DriveCtrl::FieldOriented(_) => FoCtrl::NAME,
            DriveCtrl::Trajectory(_) => TrajCtrl::NAME
        }
    }

    fn activate(&mut self) {
        match self {
            DriveCtrl::Teleop(c) => c.activate(),
            DriveCtrl::FieldOriented(c) => c.activate(),
            DriveCtrl::Trajectory(c) => c.activate()
        }
    }

    fn deactivate(&mut self) {
        match self {
            DriveCtrl::Teleop(c) => c.deactivate(),
            DriveCtrl::FieldOriented(c) => c.deactivate(),
            DriveCtrl::Trajectory(c) => c.deactivate()
        }
    }

    /// Demands for this cycle, or `None` if the controller has finished.
    fn update(&mut self, input: &InputData) -> Option<DriveDems> {
        match self {
            DriveCtrl::Teleop(c) => Some(c.update_from_inputs(&input.raw_inputs)),
            DriveCtrl::FieldOriented(c) => Some(c.update_open_loop(
                input.field_vel_ms,
                input.pose.map(|p| p.heading_rad)
            )),
            DriveCtrl::Trajectory(c) => c.update(input.pose, input.wheel_speeds)
        }
    }
}

impl<S: DriveSink> Drivetrain<S> {

    /// Name reported when no controller has the drivetrain.
    pub const IDLE: &'static str = "idle";

    /// Take ownership of the actuators, setting their neutral mode.
    pub fn new(mut sink: S, neutral_mode: NeutralMode) -> Self {
        sink.set_neutral_mode(neutral_mode);
        info!("Drivetrain neutral mode: {:?}", neutral_mode);

        Self {
            sink,
            neutral_mode,
            active: None
        }
    }

    /// Hand the drivetrain to `ctrl`, stopping whichever controller had it.
    pub fn activate(&mut self, mut ctrl: DriveCtrl) {
        self.deactivate();

        debug!("Drivetrain handed to {}", ctrl.name());
        ctrl.activate();
        self.active = Some(ctrl);
    }

    /// Interrupt the active controller, if any, and stop the drivetrain.
    pub fn deactivate(&mut self) {
        if let Some(mut ctrl) = self.active.take() {
            debug!("Drivetrain taken from {}", ctrl.name());
            ctrl.deactivate();
            self.sink.apply(DriveDems::Neutral);
        }
    }

    /// Name of the current activity.
    pub fn activity(&self) -> &'static str {
        self.active.as_ref().map(|c| c.name()).unwrap_or(Self::IDLE)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The active controller, if any.
    pub fn active(&self) -> Option<&DriveCtrl> {
        self.active.as_ref()
    }

    pub fn neutral_mode(&self) -> NeutralMode {
        self.neutral_mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: DriveSink> State for Drivetrain<S> {
    type InputData = InputData;
    type OutputData = Option<DriveDems>;
    type StatusReport = StatusReport;
    type ProcError = DrivetrainError;

    /// Run the active controller for one cycle and apply its demands.
    ///
    /// The output is the demand applied this cycle, `None` if idle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let activity = self.activity();

        let dems = match self.active.as_mut() {
            Some(ctrl) => ctrl.update(input_data),
            None => return Ok((None, StatusReport { activity, finished: false }))
        };

        match dems {
            Some(d) => {
                self.sink.apply(d);
                Ok((Some(d), StatusReport { activity, finished: false }))
            },
            None => {
                info!("{} finished", activity);
                self.deactivate();
                Ok((Some(DriveDems::Neutral), StatusReport { activity, finished: true }))
            }
        }
    }
}

impl<S: DriveSink> Drop for Drivetrain<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::kinematics::{ChassisVelocity, DiffDriveKinematics};
    use crate::traj_ctrl::TrajectorySample;
    use std::{cell::RefCell, f64::consts::FRAC_PI_2, rc::Rc};

    /// Sink recording every demand into a shared log, so it can be inspected
    /// after the drivetrain is dropped.
    #[derive(Default, Clone)]
    struct RecordingSink {
        dems: Rc<RefCell<Vec<DriveDems>>>,
        neutral_mode: Rc<RefCell<Option<NeutralMode>>>
    }

    impl DriveSink for RecordingSink {
        fn apply(&mut self, dems: DriveDems) {
            self.dems.borrow_mut().push(dems);
        }

        fn set_neutral_mode(&mut self, mode: NeutralMode) {
            *self.neutral_mode.borrow_mut() = Some(mode);
        }
    }

    impl RecordingSink {
        fn num_stops(&self) -> usize {
            self.dems.borrow().iter().filter(|d| d.is_neutral()).count()
        }
    }

    fn params() -> Params {
        util::params::from_str(r#"
            neutral_mode = "Coast"

            [teleop]
            deadband = 0.07
            speed_gain = 1.0
            turn_gain = 0.65

            [field_oriented]
            max_velocity_ms = 3.0
            track_width_m = 0.6
            heading_pid = { k_p = 1.0 }

            [trajectory]
            track_width_m = 0.6
            feedforward = { k_s = 0.2, k_v = 2.0, k_a = 0.5 }
            wheel_pid = { k_p = 1.0 }
        "#).unwrap()
    }

    fn short_trajectory() -> Trajectory {
        Trajectory::new(vec![
            TrajectorySample {
                time_s: 0.0,
                pose: Pose::default(),
                velocity_ms: 1.0,
                acceleration_mss: 0.0,
                curvature_radpm: 0.0
            },
            TrajectorySample {
                time_s: 0.1,
                pose: Pose::new(0.1, 0.0, 0.0),
                velocity_ms: 1.0,
                acceleration_mss: 0.0,
                curvature_radpm: 0.0
            },
        ]).unwrap()
    }

    fn teleop_input(speed: f64) -> InputData {
        InputData {
            raw_inputs: vec![RawInput { live: true, axes: vec![0.0, -speed] }],
            ..InputData::default()
        }
    }

    #[test]
    fn test_neutral_mode_applied() {
        let p = params();
        let sink = RecordingSink::default();
        let dt = Drivetrain::new(sink.clone(), p.neutral_mode);

        assert_eq!(*sink.neutral_mode.borrow(), Some(NeutralMode::Coast));
        assert_eq!(dt.neutral_mode(), NeutralMode::Coast);
    }

    #[test]
    fn test_idle_does_nothing() {
        let sink = RecordingSink::default();
        let mut dt = Drivetrain::new(sink.clone(), NeutralMode::Brake);

        let (out, report) = dt.proc(&InputData::default()).unwrap();
        assert_eq!(out, None);
        assert_eq!(report.activity, "idle");

        // Deactivating with nothing active doesn't stop anything
        dt.deactivate();
        drop(dt);
        assert!(sink.dems.borrow().is_empty());
    }

    #[test]
    fn test_replace_stops_once() {
        let p = params();
        let sink = RecordingSink::default();
        let mut dt = Drivetrain::new(sink.clone(), p.neutral_mode);

        dt.activate(DriveCtrl::teleop(&p).unwrap());
        assert_eq!(dt.activity(), "teleop");

        let (out, _) = dt.proc(&teleop_input(1.0)).unwrap();
        assert_eq!(out, Some(DriveDems::PercentOutput { left: 1.0, right: 1.0 }));

        dt.activate(DriveCtrl::field_oriented(&p, 0.02).unwrap());
        assert_eq!(dt.activity(), "field_oriented");
        assert_eq!(sink.num_stops(), 1);

        // No field velocity yet, so hold still
        let (out, _) = dt.proc(&InputData::default()).unwrap();
        assert_eq!(out, Some(DriveDems::PercentOutput { left: 0.0, right: 0.0 }));

        dt.deactivate();
        dt.deactivate();
        assert_eq!(sink.num_stops(), 2);
        assert_eq!(dt.activity(), "idle");
    }

    #[test]
    fn test_field_oriented_saturated_percent_output() {
        let mut p = params();
        p.field_oriented.max_velocity_ms = 2.0;
        let sink = RecordingSink::default();
        let mut dt = Drivetrain::new(sink.clone(), p.neutral_mode);

        dt.activate(DriveCtrl::field_oriented(&p, 0.02).unwrap());

        // Asked for 3 m/s along x from heading 0, past the 2 m/s limit
        let input = InputData {
            pose: Some(Pose::default()),
            field_vel_ms: Some(Vector2::new(3.0, 0.0)),
            ..InputData::default()
        };
        let (out, _) = dt.proc(&input).unwrap();

        let (left, right) = match out {
            Some(DriveDems::PercentOutput { left, right }) => (left, right),
            d => panic!("Expected percent output, got {:?}", d)
        };

        // Heading error of -pi/2 with k_p = 1 turns at pi/2 rad/s
        let unlimited = DiffDriveKinematics::new(0.6).unwrap().to_wheel_speeds(
            &ChassisVelocity { linear_ms: 3.0, angular_rads: FRAC_PI_2 }
        );

        assert!((left.abs().max(right.abs()) - 1.0).abs() < 1e-12);
        assert!((left * unlimited.right_ms - right * unlimited.left_ms).abs() < 1e-12);
        assert_eq!(sink.dems.borrow().last(), Some(&DriveDems::PercentOutput { left, right }));
    }

    #[test]
    fn test_trajectory_finishes_with_one_stop() {
        let p = params();
        let sink = RecordingSink::default();
        let mut dt = Drivetrain::new(sink.clone(), p.neutral_mode);

        dt.activate(DriveCtrl::trajectory(
            &p, 0.05, &short_trajectory(), TrajOutputMode::VelocityLocal, None
        ).unwrap());

        let input = InputData {
            pose: Some(Pose::default()),
            wheel_speeds: Some(WheelSpeeds::default()),
            ..InputData::default()
        };

        // Updates at 0.0, 0.05 and 0.1 s, finished at 0.15 s
        for _ in 0..3 {
            let (out, report) = dt.proc(&input).unwrap();
            assert!(matches!(out, Some(DriveDems::Velocity { .. })));
            assert!(!report.finished);
        }

        let (out, report) = dt.proc(&input).unwrap();
        assert_eq!(out, Some(DriveDems::Neutral));
        assert!(report.finished);
        assert_eq!(report.activity, "trajectory");
        assert_eq!(dt.activity(), "idle");

        // Nothing further, and dropping doesn't stop again
        let (out, _) = dt.proc(&input).unwrap();
        assert_eq!(out, None);
        drop(dt);
        assert_eq!(sink.num_stops(), 1);
    }

    #[test]
    fn test_drop_stops_active_controller() {
        let p = params();
        let sink = RecordingSink::default();

        {
            let mut dt = Drivetrain::new(sink.clone(), p.neutral_mode);
            dt.activate(DriveCtrl::teleop(&p).unwrap());
            dt.proc(&teleop_input(0.5)).unwrap();
        }

        let dems = sink.dems.borrow();
        assert_eq!(dems.len(), 2);
        assert_eq!(dems[1], DriveDems::Neutral);
    }
}
