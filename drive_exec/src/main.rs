//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - System input acquisition:
//!             - Pose and wheel speeds
//!             - Compressor currents and pressure switch
//!         - Telecommand processing and handling
//!         - Drivetrain processing (whichever controller has the drivetrain)
//!         - Pneumatics processing (fault supervision, fire sequence, light)
//!         - Status report archiving
//!         - Actuation (simulated)
//!
//! # Modules
//!
//! All cyclic modules (e.g. `pneumatics`) shall meet the following
//! requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!     2. Validate their parameters on construction.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use serde::Deserialize;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use drive_lib::{
    data_store::DataStore,
    drivetrain::{self, DriveCtrl, Drivetrain},
    fault_sup::FaultRegistry,
    pneumatics::{self, Pneumatics},
    sim::{self, SimDrive, SimPneumatics},
    tc_processor,
    DEFAULT_PERIOD_S
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::{self, Session}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the executable itself.
#[derive(Debug, Deserialize)]
struct ExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    #[serde(default = "default_period_s")]
    period_s: f64,

    /// Directory, relative to the software root, holding trajectory files.
    traj_dir: String,

    /// Simulated hardware parameters.
    sim: sim::Params
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "drive_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &[], &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load exec params")?;
    let drive_params: drivetrain::Params = util::params::load("drivetrain.toml")
        .wrap_err("Could not load drivetrain params")?;
    let pneu_params: pneumatics::Params = util::params::load("pneumatics.toml")
        .wrap_err("Could not load pneumatics params")?;

    if !(exec_params.period_s > 0.0) {
        return Err(eyre!("Cycle period must be positive, found {}", exec_params.period_s))
    }
    let period_s = exec_params.period_s;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected a single argument (the script path), found {}", args.len().saturating_sub(1)
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut si = ScriptInterpreter::new(&args[1])
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim_drive = SimDrive::new(exec_params.sim.clone())
        .wrap_err("Failed to initialise the simulated drivetrain")?;
    let mut sim_pneu = SimPneumatics::new(exec_params.sim.clone());

    let drivetrain = Drivetrain::new(sim_drive, drive_params.neutral_mode);
    info!("Drivetrain init complete");

    let pneumatics = Pneumatics::new(pneu_params, period_s, FaultRegistry::new())
        .wrap_err("Failed to initialise Pneumatics")?;
    info!("Pneumatics init complete");

    let mut traj_dir = host::get_sw_root()
        .wrap_err("Could not find the software root")?;
    traj_dir.push(&exec_params.traj_dir);

    let mut ds = DataStore::new(drivetrain, drive_params, pneumatics, traj_dir, period_s);

    let mut arch_drive = Archiver::from_path(&session, "drivetrain/status_report.csv")
        .wrap_err("Failed to create the drivetrain archive")?;
    let mut arch_traj = Archiver::from_path(&session, "traj_ctrl/status_report.csv")
        .wrap_err("Failed to create the trajectory control archive")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- DATA INPUT ----

        ds.drive_input.pose = Some(ds.drivetrain.sink().pose());
        ds.drive_input.wheel_speeds = Some(ds.drivetrain.sink().wheel_speeds());

        // ---- TELECOMMAND PROCESSING ----

        let elapsed_s = session::get_elapsed_seconds().unwrap_or(0.0);

        match si.get_pending_tcs(elapsed_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    if let Err(e) = tc_processor::exec(&mut ds, tc) {
                        warn!("Could not execute {:?}: {}", tc, e);
                    }
                }
            },
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.drivetrain.proc(&ds.drive_input) {
            Ok((o, r)) => {
                ds.drive_output = o;
                ds.drive_status_rpt = Some(r);
            },
            Err(e) => warn!("Error during drivetrain processing: {}", e)
        }

        // ---- ARCHIVING ----

        if let Some(ref r) = ds.drive_status_rpt {
            if let Err(e) = arch_drive.serialise(r) {
                warn!("Could not archive the drivetrain report: {}", e);
            }
        }
        if let Some(DriveCtrl::Trajectory(traj_ctrl)) = ds.drivetrain.active() {
            if let Err(e) = arch_traj.serialise(traj_ctrl.report()) {
                warn!("Could not archive the trajectory control report: {}", e);
            }
        }

        match ds.pneumatics.proc(&ds.pneu_sens) {
            Ok((o, r)) => {
                ds.pneu_dems = o;

                let registry = ds.pneumatics.registry();
                let new_trips = &registry.trips()[registry.num_trips().saturating_sub(r.num_new_faults)..];
                for trip in new_trips {
                    warn!(
                        "{} {} held off until faults are reset ({} trip(s) this session)",
                        registry.name(trip.id),
                        trip.id.index(),
                        registry.num_trips()
                    );
                }
            },
            Err(e) => warn!("Error during pneumatics processing: {}", e)
        }

        // ---- ACTUATION ----

        ds.drivetrain.sink_mut().step(period_s);
        sim_pneu.apply(ds.pneu_dems);
        ds.pneu_sens = sim_pneu.step(period_s);

        if ds.is_1_hz_cycle && ds.drivetrain.is_active() {
            info!(
                "[{}] pose {:?}, output {:?}",
                ds.drivetrain.activity(),
                ds.drivetrain.sink().pose(),
                ds.drive_output
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - period_s
            )
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    ds.drivetrain.deactivate();

    info!("End of execution");

    Ok(())
}

fn default_period_s() -> f64 {
    DEFAULT_PERIOD_S
}
