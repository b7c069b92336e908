//! Implementations for the Pneumatics state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use super::{Params, PneumaticsError};
use crate::fault_sup::{CurrentFaultSupervisor, FaultRegistry};
use comms_if::eqpt::pneu::{PneuDems, PneuSensData, NUM_COMPRESSORS};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pneumatics module state
#[derive(Debug)]
pub struct Pneumatics {
    params: Params,

    /// Cycle period
    ///
    /// Units: seconds
    period_s: f64,

    /// One supervisor per compressor
    supervisors: Vec<CurrentFaultSupervisor>,

    registry: FaultRegistry,

    /// Whether the compressors have been asked to run
    compressors_requested: bool,

    solenoid_open: bool,
    light_on: bool,

    fire: FireState,

    /// Time since the light was last toggled
    light_timer_s: f64
}

/// Status report for pneumatics processing.
#[derive(Debug, Default, Copy, Clone)]
pub struct StatusReport {
    /// Which compressors are held off by a tripped supervisor.
    pub compressor_tripped: [bool; NUM_COMPRESSORS],

    /// Number of supervisors which tripped this cycle.
    pub num_new_faults: usize,

    pub firing: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
enum FireState {
    Idle,

    /// Valve open, closes once `open_s` reaches the fire time
    Firing { open_s: f64 }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pneumatics {

    /// Create the module, with the compressors off and the valve closed.
    pub fn new(
        params: Params,
        period_s: f64,
        mut registry: FaultRegistry
    ) -> Result<Self, PneumaticsError> {
        if !(params.fire_time_s > 0.0) {
            return Err(PneumaticsError::InvalidFireTime(params.fire_time_s))
        }
        if !(params.light_flash_period_s > 0.0) {
            return Err(PneumaticsError::InvalidFlashPeriod(params.light_flash_period_s))
        }

        let supervisors = (0..NUM_COMPRESSORS)
            .map(|_| CurrentFaultSupervisor::new(
                params.compressor_limit, &mut registry, "Compressor"
            ))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            params,
            period_s,
            supervisors,
            registry,
            compressors_requested: false,
            solenoid_open: false,
            light_on: false,
            fire: FireState::Idle,
            light_timer_s: 0.0
        })
    }

    pub fn enable_compressors(&mut self) {
        debug!("Compressors enabled");
        self.compressors_requested = true;
    }

    pub fn disable_compressors(&mut self) {
        debug!("Compressors disabled");
        self.compressors_requested = false;
    }

    pub fn open_solenoid(&mut self) {
        self.solenoid_open = true;
    }

    pub fn close_solenoid(&mut self) {
        self.solenoid_open = false;
    }

    /// Fire the cannon: stop the compressors and hold the valve open for the
    /// fire time.
    pub fn fire(&mut self) -> Result<(), PneumaticsError> {
        if self.is_firing() {
            return Err(PneumaticsError::AlreadyFiring)
        }

        info!("Firing");
        self.disable_compressors();
        self.open_solenoid();
        self.fire = FireState::Firing { open_s: 0.0 };

        Ok(())
    }

    pub fn is_firing(&self) -> bool {
        self.fire != FireState::Idle
    }

    /// Re-arm every tripped compressor supervisor.
    pub fn reset_faults(&mut self) {
        for sup in self.supervisors.iter_mut() {
            sup.reset();
        }
    }

    pub fn registry(&self) -> &FaultRegistry {
        &self.registry
    }

    fn toggle_light_if_full(&mut self, pressure_full: bool) {
        if pressure_full {
            self.light_on = !self.light_on;
        }
    }
}

impl State for Pneumatics {
    type InputData = PneuSensData;
    type OutputData = PneuDems;
    type StatusReport = StatusReport;
    type ProcError = PneumaticsError;

    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut report = StatusReport::default();

        // Supervise the compressors
        for (i, sup) in self.supervisors.iter_mut().enumerate() {
            if let Some(event) = sup.check(input_data.compressor_current_a[i], self.period_s) {
                self.registry.record(event);
                report.num_new_faults += 1;
            }
            report.compressor_tripped[i] = sup.is_tripped();
        }

        // Advance the fire sequence
        if let FireState::Firing { open_s } = self.fire {
            let open_s = open_s + self.period_s;

            if open_s >= self.params.fire_time_s {
                self.close_solenoid();
                self.fire = FireState::Idle;
                debug!("Fire complete");
            }
            else {
                self.fire = FireState::Firing { open_s };
            }
        }
        report.firing = self.is_firing();

        // Flash the light while the tanks are full
        self.light_timer_s += self.period_s;
        if self.light_timer_s >= self.params.light_flash_period_s {
            self.light_timer_s = 0.0;
            self.toggle_light_if_full(input_data.pressure_full);
        }
        if !input_data.pressure_full {
            self.light_on = false;
        }

        let mut compressor_enabled = [false; NUM_COMPRESSORS];
        for (enabled, tripped) in compressor_enabled.iter_mut()
            .zip(report.compressor_tripped.iter())
        {
            *enabled = self.compressors_requested && !tripped;
        }

        Ok((
            PneuDems {
                compressor_enabled,
                solenoid_open: self.solenoid_open,
                light_on: self.light_on
            },
            report
        ))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn pneumatics() -> Pneumatics {
        Pneumatics::new(Params::default(), 0.25, FaultRegistry::new()).unwrap()
    }

    fn sens(current_a: [f64; NUM_COMPRESSORS], pressure_full: bool) -> PneuSensData {
        PneuSensData {
            compressor_current_a: current_a,
            pressure_full
        }
    }

    #[test]
    fn test_starts_safe() {
        let mut pneu = pneumatics();
        let (dems, _) = pneu.proc(&sens([0.0; 2], false)).unwrap();

        assert_eq!(dems, PneuDems::default());
    }

    #[test]
    fn test_fire_sequence() {
        let mut pneu = pneumatics();
        pneu.enable_compressors();
        pneu.fire().unwrap();

        assert!(matches!(pneu.fire(), Err(PneumaticsError::AlreadyFiring)));

        // 0.75 s fire time at 0.25 s per cycle
        for _ in 0..2 {
            let (dems, report) = pneu.proc(&sens([0.0; 2], false)).unwrap();
            assert!(dems.solenoid_open);
            assert_eq!(dems.compressor_enabled, [false; 2]);
            assert!(report.firing);
        }

        let (dems, report) = pneu.proc(&sens([0.0; 2], false)).unwrap();
        assert!(!dems.solenoid_open);
        assert!(!report.firing);

        // Can fire again once closed
        assert!(pneu.fire().is_ok());
    }

    #[test]
    fn test_trip_disables_one_compressor() {
        let mut pneu = pneumatics();
        pneu.enable_compressors();

        // 0.5 s trip time, trips on the third 0.25 s cycle over current
        let mut new_faults = 0;
        let mut last = None;
        for _ in 0..3 {
            let (dems, report) = pneu.proc(&sens([25.0, 5.0], false)).unwrap();
            new_faults += report.num_new_faults;
            last = Some((dems, report));
        }
        let (dems, report) = last.unwrap();

        assert_eq!(new_faults, 1);
        assert_eq!(report.compressor_tripped, [true, false]);
        assert_eq!(dems.compressor_enabled, [false, true]);
        assert_eq!(pneu.registry().num_trips(), 1);

        // Current dropping doesn't re-arm
        let (dems, _) = pneu.proc(&sens([0.0, 0.0], false)).unwrap();
        assert_eq!(dems.compressor_enabled, [false, true]);

        pneu.reset_faults();
        let (dems, _) = pneu.proc(&sens([0.0, 0.0], false)).unwrap();
        assert_eq!(dems.compressor_enabled, [true, true]);
    }

    #[test]
    fn test_light_flashes_when_full() {
        let mut pneu = pneumatics();

        // 1 s flash period is four cycles
        let mut lights = Vec::new();
        for _ in 0..8 {
            let (dems, _) = pneu.proc(&sens([0.0; 2], true)).unwrap();
            lights.push(dems.light_on);
        }
        assert_eq!(lights, vec![false, false, false, true, true, true, true, false]);

        // Pressure dropping turns it straight off
        for _ in 0..3 {
            pneu.proc(&sens([0.0; 2], true)).unwrap();
        }
        let (dems, _) = pneu.proc(&sens([0.0; 2], false)).unwrap();
        assert!(!dems.light_on);
    }

    #[test]
    fn test_invalid_params() {
        let mut params = Params::default();
        params.fire_time_s = 0.0;
        assert!(Pneumatics::new(params, 0.02, FaultRegistry::new()).is_err());

        let mut params = Params::default();
        params.compressor_limit.trip_duration_s = -1.0;
        assert!(Pneumatics::new(params, 0.02, FaultRegistry::new()).is_err());
    }
}
