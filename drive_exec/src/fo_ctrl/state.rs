//! Implementations for the FoCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector2;

// Internal
use super::{FoCtrlError, Params};
use crate::kinematics::{normalise, ChassisVelocity, DiffDriveKinematics, WheelSpeeds};
use crate::pid::PidController;
use comms_if::eqpt::drive::DriveDems;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Field oriented control module state
#[derive(Debug, Clone)]
pub struct FoCtrl {
    max_velocity_ms: f64,

    kinematics: DiffDriveKinematics,

    /// Heading controller, driving the heading error to zero
    heading_ctrl: PidController,

    report: StatusReport
}

/// Monitoring quantities from the last update.
#[derive(Debug, Copy, Clone, Default)]
pub struct StatusReport {
    /// Heading error to the desired direction of travel.
    ///
    /// Units: radians
    pub heading_error_rad: f64,

    /// True if the wheel speeds were scaled down to the maximum velocity.
    pub velocity_limited: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FoCtrl {

    /// Name reported by the drivetrain while this controller is active.
    pub const NAME: &'static str = "field_oriented";

    /// Create a new controller, updated every `period_s`.
    pub fn new(params: &Params, period_s: f64) -> Result<Self, FoCtrlError> {
        if !(params.max_velocity_ms.is_finite() && params.max_velocity_ms > 0.0) {
            return Err(FoCtrlError::InvalidMaxVelocity(params.max_velocity_ms))
        }
        if !params.heading_pid.is_finite() {
            return Err(FoCtrlError::InvalidHeadingGains(params.heading_pid))
        }
        if !(period_s.is_finite() && period_s > 0.0) {
            return Err(FoCtrlError::InvalidPeriod(period_s))
        }

        Ok(Self {
            max_velocity_ms: params.max_velocity_ms,
            kinematics: DiffDriveKinematics::new(params.track_width_m)?,
            heading_ctrl: PidController::new(params.heading_pid, period_s),
            report: StatusReport::default()
        })
    }

    /// Clear the heading controller's history. Must be called whenever the
    /// controller takes over the drivetrain.
    pub fn reset(&mut self) {
        self.heading_ctrl.reset();
        self.report = StatusReport::default();
    }

    pub fn activate(&mut self) {
        self.reset();
        debug!("FoCtrl activated");
    }

    pub fn deactivate(&mut self) {
        debug!("FoCtrl deactivated");
    }

    /// Wheel speeds for the current field velocity demand and heading.
    ///
    /// If either the demand or the heading is unavailable (or not finite)
    /// the robot is held still.
    pub fn update(
        &mut self,
        field_vel_ms: Option<Vector2<f64>>,
        heading_rad: Option<f64>
    ) -> WheelSpeeds {
        match (field_vel_ms, heading_rad) {
            (Some(v), Some(h)) if v.iter().all(|c| c.is_finite()) && h.is_finite() => {
                self.calculate(&v, h)
            },
            _ => WheelSpeeds::default()
        }
    }

    /// Percent output demand for the current field velocity demand and
    /// heading.
    ///
    /// Wheel speeds are taken as a fraction of the maximum velocity and go
    /// through the same normaliser as teleop demands.
    pub fn update_open_loop(
        &mut self,
        field_vel_ms: Option<Vector2<f64>>,
        heading_rad: Option<f64>
    ) -> DriveDems {
        let speeds = self.update(field_vel_ms, heading_rad);
        let (left, right) = normalise(
            speeds.left_ms / self.max_velocity_ms,
            speeds.right_ms / self.max_velocity_ms
        );

        DriveDems::PercentOutput { left, right }
    }

    /// Wheel speeds for the field velocity `vel_ms` given the current
    /// `heading_rad`.
    ///
    /// `vel_ms[0]` points away from the driver station wall, `vel_ms[1]` to
    /// the left.
    pub fn calculate(&mut self, vel_ms: &Vector2<f64>, heading_rad: f64) -> WheelSpeeds {
        let desired_heading_rad = vel_ms[0].atan2(vel_ms[1]);
        let heading_error_rad = wrap_pi(heading_rad - desired_heading_rad);

        let angular_rads = self.heading_ctrl.calculate(heading_error_rad, 0.0);

        // Only the component along the robot's heading can be driven
        let (sin_h, cos_h) = heading_rad.sin_cos();
        let chassis = ChassisVelocity {
            linear_ms: vel_ms[0] * cos_h + vel_ms[1] * sin_h,
            angular_rads
        };

        let unlimited = self.kinematics.to_wheel_speeds(&chassis);
        let speeds = unlimited.desaturate(self.max_velocity_ms);

        self.report = StatusReport {
            heading_error_rad,
            velocity_limited: speeds != unlimited
        };

        trace!("FoCtrl heading error {:.3} rad, {:?}", heading_error_rad, speeds);

        speeds
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::pid::PidGains;
    use std::f64::consts::FRAC_PI_4;

    fn params() -> Params {
        Params {
            max_velocity_ms: 3.0,
            track_width_m: 0.6,
            heading_pid: PidGains { k_p: 1.0, k_i: 0.0, k_d: 0.0 }
        }
    }

    #[test]
    fn test_zero_heading_error_matches_kinematics() {
        let mut ctrl = FoCtrl::new(&params(), 0.02).unwrap();
        let kin = DiffDriveKinematics::new(0.6).unwrap();

        let speeds = ctrl.calculate(&Vector2::new(1.0, 1.0), FRAC_PI_4);
        let expected = kin.to_wheel_speeds(&ChassisVelocity {
            linear_ms: FRAC_PI_4.cos() + FRAC_PI_4.sin(),
            angular_rads: 0.0
        });

        assert!((speeds.left_ms - expected.left_ms).abs() < 1e-12);
        assert!((speeds.right_ms - expected.right_ms).abs() < 1e-12);
        assert!(!ctrl.report().velocity_limited);
    }

    #[test]
    fn test_clamp_preserves_ratio() {
        let mut p = params();
        p.max_velocity_ms = 2.0;
        let mut ctrl = FoCtrl::new(&p, 0.02).unwrap();
        let mut unclamped_ctrl = FoCtrl::new(&params(), 0.02).unwrap();

        let vel = Vector2::new(3.0, 0.0);
        let speeds = ctrl.calculate(&vel, 0.0);
        let unclamped = unclamped_ctrl.calculate(&vel, 0.0);

        // Unclamped the right side is the faster one
        assert!(unclamped.right_ms > 2.0);

        let factor = speeds.right_ms / unclamped.right_ms;
        assert!((speeds.right_ms - 2.0).abs() < 1e-12);
        assert!((speeds.left_ms - unclamped.left_ms * factor).abs() < 1e-12);
        assert!(ctrl.report().velocity_limited);
    }

    #[test]
    fn test_missing_inputs_hold_still() {
        let mut ctrl = FoCtrl::new(&params(), 0.02).unwrap();

        assert_eq!(ctrl.update(None, Some(0.0)), WheelSpeeds::default());
        assert_eq!(
            ctrl.update(Some(Vector2::new(1.0, 0.0)), None),
            WheelSpeeds::default()
        );
        assert_eq!(
            ctrl.update(Some(Vector2::new(std::f64::NAN, 0.0)), Some(0.0)),
            WheelSpeeds::default()
        );
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params();
        p.max_velocity_ms = 0.0;
        assert!(FoCtrl::new(&p, 0.02).is_err());

        let mut p = params();
        p.track_width_m = -1.0;
        assert!(FoCtrl::new(&p, 0.02).is_err());

        let mut p = params();
        p.heading_pid.k_d = std::f64::NAN;
        assert!(matches!(
            FoCtrl::new(&p, 0.02),
            Err(FoCtrlError::InvalidHeadingGains(_))
        ));

        assert!(matches!(
            FoCtrl::new(&params(), 0.0),
            Err(FoCtrlError::InvalidPeriod(_))
        ));
        assert!(FoCtrl::new(&params(), std::f64::INFINITY).is_err());
    }
}
