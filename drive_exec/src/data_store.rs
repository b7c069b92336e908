//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::PathBuf;

// Internal
use comms_if::eqpt::{drive::DriveDems, pneu::{PneuDems, PneuSensData}};
use crate::{
    drivetrain::{self, DriveSink, Drivetrain},
    pneumatics::Pneumatics
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore<S: DriveSink> {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Cycle period
    ///
    /// Units: seconds
    pub period_s: f64,

    // Drivetrain
    pub drivetrain: Drivetrain<S>,
    pub drive_params: drivetrain::Params,

    /// Drivetrain inputs. Commanded values (axes, field velocity) persist
    /// until the next command changes them, measurements are refreshed
    /// every cycle.
    pub drive_input: drivetrain::InputData,
    pub drive_output: Option<DriveDems>,
    pub drive_status_rpt: Option<drivetrain::StatusReport>,

    /// Directory trajectory files are loaded from
    pub traj_dir: PathBuf,

    // Pneumatics
    pub pneumatics: Pneumatics,
    pub pneu_sens: PneuSensData,
    pub pneu_dems: PneuDems
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl<S: DriveSink> DataStore<S> {
    pub fn new(
        drivetrain: Drivetrain<S>,
        drive_params: drivetrain::Params,
        pneumatics: Pneumatics,
        traj_dir: PathBuf,
        period_s: f64
    ) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            period_s,
            drivetrain,
            drive_params,
            drive_input: drivetrain::InputData::default(),
            drive_output: None,
            drive_status_rpt: None,
            traj_dir,
            pneumatics,
            pneu_sens: PneuSensData::default(),
            pneu_dems: PneuDems::default()
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the outputs of the previous cycle and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self) {
        let cycles_per_s = ((1.0 / self.period_s).round() as u64).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.drive_output = None;
        self.drive_status_rpt = None;
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}
