//! # Current fault supervision
//!
//! Watches the current drawn by an actuator and trips if it stays above a
//! threshold for longer than a trip duration. A tripped supervisor stays
//! tripped until it is explicitly reset: there is no automatic re-arming.
//!
//! Supervisors are numbered by a [`FaultRegistry`], which also keeps count of
//! every trip. The registry is owned by whatever owns the supervisors.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{error, info};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Slack allowed on the trip comparison, so that rounding in the summed tick
/// periods doesn't trip a tick early.
///
/// Units: seconds
const TRIP_TOLERANCE_S: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of a current fault supervisor.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct Params {
    /// Current above which the over-current timer runs.
    ///
    /// Units: amps
    pub threshold_a: f64,

    /// Time the current must stay above the threshold before tripping.
    ///
    /// Units: seconds
    pub trip_duration_s: f64
}

/// Identifier of a supervisor within its registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SupervisorId(usize);

/// Numbers supervisors and keeps a record of trips.
#[derive(Debug, Default)]
pub struct FaultRegistry {
    names: Vec<String>,
    trips: Vec<FaultEvent>
}

/// Reported when a supervisor trips.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaultEvent {
    pub id: SupervisorId,

    /// Current measured on the tick that tripped.
    ///
    /// Units: amps
    pub current_a: f64,

    /// Units: seconds
    pub over_current_s: f64
}

/// Over-current supervisor for a single actuator.
#[derive(Debug, Clone)]
pub struct CurrentFaultSupervisor {
    id: SupervisorId,
    name: String,
    params: Params,

    /// Time the current has been continuously above the threshold
    over_current_s: f64,

    state: SupervisorState
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    /// Watching, actuator allowed to run
    Armed,

    /// Actuator must stay disabled until reset
    Tripped
}

#[derive(Debug, Error)]
pub enum FaultSupError {
    #[error("Trip duration must be positive, got {0} s")]
    InvalidTripDuration(f64),

    #[error("Current threshold must be finite, got {0} A")]
    InvalidThreshold(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number a new supervisor.
    pub fn register(&mut self, name: &str) -> SupervisorId {
        self.names.push(name.to_string());
        SupervisorId(self.names.len() - 1)
    }

    pub fn record(&mut self, event: FaultEvent) {
        self.trips.push(event);
    }

    pub fn name(&self, id: SupervisorId) -> &str {
        self.names.get(id.0).map(|s| s.as_str()).unwrap_or("unknown")
    }

    /// Every trip recorded so far, oldest first.
    pub fn trips(&self) -> &[FaultEvent] {
        &self.trips
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }
}

impl SupervisorId {
    /// Index of the supervisor, in registration order from 0.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl CurrentFaultSupervisor {

    pub fn new(
        params: Params,
        registry: &mut FaultRegistry,
        name: &str
    ) -> Result<Self, FaultSupError> {
        if !(params.trip_duration_s.is_finite() && params.trip_duration_s > 0.0) {
            return Err(FaultSupError::InvalidTripDuration(params.trip_duration_s))
        }
        if !params.threshold_a.is_finite() {
            return Err(FaultSupError::InvalidThreshold(params.threshold_a))
        }

        Ok(Self {
            id: registry.register(name),
            name: name.to_string(),
            params,
            over_current_s: 0.0,
            state: SupervisorState::Armed
        })
    }

    /// Feed one tick's current measurement.
    ///
    /// Returns the fault event on the tick the supervisor trips, and `None`
    /// otherwise (including every tick after tripping).
    pub fn check(&mut self, current_a: f64, period_s: f64) -> Option<FaultEvent> {
        if self.state == SupervisorState::Tripped {
            return None
        }

        if current_a > self.params.threshold_a {
            self.over_current_s += period_s;

            if self.over_current_s > self.params.trip_duration_s + TRIP_TOLERANCE_S {
                self.state = SupervisorState::Tripped;

                error!(
                    "Disabled {} {}! Current: {:.1} A for {:.2} s",
                    self.name, self.id.0, current_a, self.over_current_s
                );

                return Some(FaultEvent {
                    id: self.id,
                    current_a,
                    over_current_s: self.over_current_s
                })
            }
        }
        else {
            self.over_current_s = 0.0;
        }

        None
    }

    /// Re-arm after a trip.
    pub fn reset(&mut self) {
        if self.state == SupervisorState::Tripped {
            info!("Re-armed {} {}", self.name, self.id.0);
        }
        self.state = SupervisorState::Armed;
        self.over_current_s = 0.0;
    }

    pub fn id(&self) -> SupervisorId {
        self.id
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn is_tripped(&self) -> bool {
        self.state == SupervisorState::Tripped
    }

    /// Units: seconds
    pub fn over_current_s(&self) -> f64 {
        self.over_current_s
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn supervisor(registry: &mut FaultRegistry) -> CurrentFaultSupervisor {
        CurrentFaultSupervisor::new(
            Params { threshold_a: 18.0, trip_duration_s: 1.0 },
            registry,
            "compressor"
        ).unwrap()
    }

    #[test]
    fn test_trips_after_duration() {
        let mut registry = FaultRegistry::new();
        let mut sup = supervisor(&mut registry);

        // Four ticks of 0.25 s is exactly the trip duration, not over it
        for _ in 0..4 {
            assert_eq!(sup.check(19.0, 0.25), None);
        }
        assert!(!sup.is_tripped());

        let event = sup.check(19.0, 0.25).unwrap();
        assert_eq!(event.id, sup.id());
        assert_eq!(event.over_current_s, 1.25);
        assert!(sup.is_tripped());

        // Stays tripped, reports only once
        assert_eq!(sup.check(0.0, 0.25), None);
        assert_eq!(sup.check(19.0, 0.25), None);
        assert_eq!(sup.state(), SupervisorState::Tripped);
    }

    #[test]
    fn test_trips_on_tick_after_duration() {
        let mut registry = FaultRegistry::new();
        let mut sup = CurrentFaultSupervisor::new(
            Params { threshold_a: 18.0, trip_duration_s: 0.5 },
            &mut registry,
            "compressor"
        ).unwrap();

        // 25 ticks of 20 ms sum to the trip duration (plus rounding)
        for _ in 0..25 {
            assert_eq!(sup.check(19.0, 0.02), None);
        }
        assert!(!sup.is_tripped());

        // Tick 26 is the first one over it
        assert!(sup.check(19.0, 0.02).is_some());
        assert!(sup.is_tripped());
    }

    #[test]
    fn test_low_current_resets_timer() {
        let mut registry = FaultRegistry::new();
        let mut sup = supervisor(&mut registry);

        for _ in 0..4 {
            sup.check(19.0, 0.25);
        }
        assert_eq!(sup.over_current_s(), 1.0);

        // At the threshold counts as not over it
        sup.check(18.0, 0.25);
        assert_eq!(sup.over_current_s(), 0.0);

        for _ in 0..4 {
            assert_eq!(sup.check(19.0, 0.25), None);
        }
        assert!(!sup.is_tripped());
    }

    #[test]
    fn test_reset_rearms() {
        let mut registry = FaultRegistry::new();
        let mut sup = supervisor(&mut registry);

        for _ in 0..5 {
            sup.check(30.0, 0.25);
        }
        assert!(sup.is_tripped());

        sup.reset();
        assert_eq!(sup.state(), SupervisorState::Armed);
        assert_eq!(sup.over_current_s(), 0.0);
    }

    #[test]
    fn test_registry() {
        let mut registry = FaultRegistry::new();
        let a = supervisor(&mut registry);
        let b = supervisor(&mut registry);

        assert_eq!(a.id().index(), 0);
        assert_eq!(b.id().index(), 1);
        assert_eq!(registry.name(b.id()), "compressor");

        registry.record(FaultEvent { id: b.id(), current_a: 20.0, over_current_s: 0.6 });
        assert_eq!(registry.num_trips(), 1);
        assert_eq!(registry.trips()[0].id, b.id());
    }

    #[test]
    fn test_invalid_params() {
        let mut registry = FaultRegistry::new();

        assert!(CurrentFaultSupervisor::new(
            Params { threshold_a: 18.0, trip_duration_s: 0.0 },
            &mut registry,
            "compressor"
        ).is_err());

        assert!(CurrentFaultSupervisor::new(
            Params { threshold_a: std::f64::NAN, trip_duration_s: 0.5 },
            &mut registry,
            "compressor"
        ).is_err());
    }
}
