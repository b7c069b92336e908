//! # Simulated hardware
//!
//! Stand-ins for the actuation layer so that the executable can run without a
//! robot: a differential drivetrain integrated as a unicycle, and a pneumatics
//! plant whose tanks fill while the compressors run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Deserialize;

// Internal
use crate::{
    drivetrain::DriveSink,
    kinematics::{DiffDriveKinematics, KinematicsError, WheelSpeeds},
    loc::{Pose, Twist},
    traj_ctrl::SimpleMotorFeedforward
};
use comms_if::eqpt::{
    drive::{DriveDems, NeutralMode},
    pneu::{PneuDems, PneuSensData, NUM_COMPRESSORS}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated hardware.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Speed of a side at full percent output.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Units: meters
    pub track_width_m: f64,

    /// Motor model used to turn voltage demands into speed.
    pub feedforward: SimpleMotorFeedforward,

    /// Time constant of the speed decay when coasting.
    ///
    /// Units: seconds
    pub coast_time_constant_s: f64,

    /// Current drawn by each compressor while running.
    ///
    /// Units: amps
    pub compressor_current_a: [f64; NUM_COMPRESSORS],

    /// Time for one compressor to fill the tanks from empty.
    ///
    /// Units: seconds
    pub fill_time_s: f64
}

/// Simulated differential drivetrain.
#[derive(Debug, Clone)]
pub struct SimDrive {
    params: Params,
    kinematics: DiffDriveKinematics,

    demand: DriveDems,
    neutral_mode: NeutralMode,

    pose: Pose,
    wheel_speeds: WheelSpeeds
}

/// Simulated pneumatics plant.
#[derive(Debug, Clone)]
pub struct SimPneumatics {
    params: Params,

    /// Tank pressure as a fraction of full
    pressure_frac: f64,

    dems: PneuDems
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDrive {
    pub fn new(params: Params) -> Result<Self, KinematicsError> {
        Ok(Self {
            kinematics: DiffDriveKinematics::new(params.track_width_m)?,
            params,
            demand: DriveDems::Neutral,
            neutral_mode: NeutralMode::default(),
            pose: Pose::default(),
            wheel_speeds: WheelSpeeds::default()
        })
    }

    /// Advance the simulation by `period_s` under the last applied demand.
    pub fn step(&mut self, period_s: f64) {
        let ff = &self.params.feedforward;
        let max = self.params.max_speed_ms;

        let side = |current_ms: f64, target: Option<f64>| -> f64 {
            match target {
                Some(t) => t.max(-max).min(max),
                None => current_ms
            }
        };

        let (left, right) = match self.demand {
            DriveDems::PercentOutput { left, right } => (Some(left * max), Some(right * max)),
            DriveDems::Voltage { left_v, right_v } => (
                Some(ff.steady_state_velocity(left_v)),
                Some(ff.steady_state_velocity(right_v))
            ),
            DriveDems::Velocity { left_ms, right_ms } => (Some(left_ms), Some(right_ms)),
            DriveDems::Neutral => match self.neutral_mode {
                NeutralMode::Brake => (Some(0.0), Some(0.0)),
                NeutralMode::Coast => {
                    let decay = (-period_s / self.params.coast_time_constant_s).exp();
                    (
                        Some(self.wheel_speeds.left_ms * decay),
                        Some(self.wheel_speeds.right_ms * decay)
                    )
                }
            }
        };

        self.wheel_speeds = WheelSpeeds::new(
            side(self.wheel_speeds.left_ms, left),
            side(self.wheel_speeds.right_ms, right)
        );

        let chassis = self.kinematics.to_chassis(&self.wheel_speeds);
        self.pose = self.pose.exp(&Twist {
            dx_m: chassis.linear_ms * period_s,
            dy_m: 0.0,
            dtheta_rad: chassis.angular_rads * period_s
        });

        trace!("SimDrive {:?} {:?}", self.pose, self.wheel_speeds);
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn wheel_speeds(&self) -> WheelSpeeds {
        self.wheel_speeds
    }

    pub fn demand(&self) -> DriveDems {
        self.demand
    }
}

impl DriveSink for SimDrive {
    fn apply(&mut self, dems: DriveDems) {
        self.demand = dems;
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.neutral_mode = mode;
    }
}

impl SimPneumatics {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            pressure_frac: 0.0,
            dems: PneuDems::default()
        }
    }

    /// Set the demands to act on for the next step.
    pub fn apply(&mut self, dems: PneuDems) {
        self.dems = dems;
    }

    /// Advance the plant and return the sensor readings.
    pub fn step(&mut self, period_s: f64) -> PneuSensData {
        let mut sens = PneuSensData::default();

        for i in 0..NUM_COMPRESSORS {
            if self.dems.compressor_enabled[i] && self.pressure_frac < 1.0 {
                sens.compressor_current_a[i] = self.params.compressor_current_a[i];
                self.pressure_frac += period_s / self.params.fill_time_s;
            }
        }

        // An open valve vents the tanks
        if self.dems.solenoid_open {
            self.pressure_frac = 0.0;
        }

        self.pressure_frac = self.pressure_frac.min(1.0);
        sens.pressure_full = self.pressure_frac >= 1.0;

        sens
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            max_speed_ms: 4.0,
            track_width_m: 0.6,
            feedforward: SimpleMotorFeedforward::new(0.5, 2.0, 0.0),
            coast_time_constant_s: 0.5,
            compressor_current_a: [10.0, 10.0],
            fill_time_s: 1.0
        }
    }

    #[test]
    fn test_drive_straight() {
        let mut sim = SimDrive::new(params()).unwrap();

        sim.apply(DriveDems::PercentOutput { left: 0.5, right: 0.5 });
        for _ in 0..10 {
            sim.step(0.1);
        }

        assert!((sim.pose().x() - 2.0).abs() < 1e-9);
        assert!(sim.pose().y().abs() < 1e-9);
        assert_eq!(sim.wheel_speeds(), WheelSpeeds::new(2.0, 2.0));
    }

    #[test]
    fn test_voltage_and_stop() {
        let mut sim = SimDrive::new(params()).unwrap();
        sim.set_neutral_mode(NeutralMode::Brake);

        sim.apply(DriveDems::Voltage { left_v: 2.5, right_v: -2.5 });
        sim.step(0.1);
        assert_eq!(sim.wheel_speeds(), WheelSpeeds::new(1.0, -1.0));
        assert!(sim.pose().heading_rad < 0.0);

        sim.apply(DriveDems::Neutral);
        sim.step(0.1);
        assert_eq!(sim.wheel_speeds(), WheelSpeeds::default());
    }

    #[test]
    fn test_coast_decays() {
        let mut sim = SimDrive::new(params()).unwrap();
        sim.set_neutral_mode(NeutralMode::Coast);

        sim.apply(DriveDems::Velocity { left_ms: 2.0, right_ms: 2.0 });
        sim.step(0.1);
        sim.apply(DriveDems::Neutral);
        sim.step(0.1);

        let ws = sim.wheel_speeds();
        assert!(ws.left_ms > 0.0 && ws.left_ms < 2.0);
    }

    #[test]
    fn test_pneumatics_fill_and_vent() {
        let mut sim = SimPneumatics::new(params());

        sim.apply(PneuDems {
            compressor_enabled: [true, true],
            ..PneuDems::default()
        });

        let sens = sim.step(0.25);
        assert_eq!(sens.compressor_current_a, [10.0, 10.0]);
        assert!(!sens.pressure_full);

        let sens = sim.step(0.25);
        assert!(sens.pressure_full);

        sim.apply(PneuDems {
            solenoid_open: true,
            ..PneuDems::default()
        });
        assert!(!sim.step(0.25).pressure_full);
    }
}
