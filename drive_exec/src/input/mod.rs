//! # Input conditioning
//!
//! Turns raw joystick axes into speed and turn demands: picks the live input
//! source, reads the mapped axes, and removes the deadband without losing
//! full scale.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use thiserror::Error;

// Internal
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated deadband width in [0, 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Deadband(f64);

/// Which raw axes feed the speed and turn demands.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisMap {
    pub speed_axis: usize,
    pub turn_axis: usize,

    /// Negate the speed axis (sticks usually report forwards as negative).
    #[serde(default)]
    pub invert_speed: bool,

    #[serde(default)]
    pub invert_turn: bool
}

/// One raw input source, e.g. a joystick or a gamepad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    /// False if the device is unplugged or has stopped reporting.
    pub live: bool,

    /// Axis values, nominally in [-1, 1].
    pub axes: Vec<f64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Deadband must be in [0, 1), got {0}")]
    InvalidDeadband(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Deadband {
    pub fn new(width: f64) -> Result<Self, InputError> {
        if width >= 0.0 && width < 1.0 {
            Ok(Self(width))
        }
        else {
            Err(InputError::InvalidDeadband(width))
        }
    }

    /// Condition a raw axis value with this deadband.
    pub fn apply(&self, raw: f64) -> f64 {
        condition(raw, self.0)
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self {
            speed_axis: 1,
            turn_axis: 0,
            invert_speed: true,
            invert_turn: true
        }
    }
}

impl AxisMap {

    /// Read the (speed, turn) pair from a raw input.
    ///
    /// Axes the device doesn't have read as zero.
    pub fn read(&self, input: &RawInput) -> (f64, f64) {
        let axis = |idx: usize, invert: bool| {
            let value = input.axes.get(idx).map(|&v| sanitise_axis(v)).unwrap_or(0.0);
            if invert { -value } else { value }
        };

        (
            axis(self.speed_axis, self.invert_speed),
            axis(self.turn_axis, self.invert_turn)
        )
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Remove the deadband from a raw axis value.
///
/// Values with magnitude below `deadband` become zero, the rest are linearly
/// remapped so that the output is continuous at the deadband edge and still
/// reaches +/-1 at full deflection. `deadband` must be in [0, 1), which
/// `Deadband` enforces.
pub fn condition(raw: f64, deadband: f64) -> f64 {
    if raw.abs() < deadband {
        0.0
    }
    else {
        raw.signum() * lin_map((deadband, 1.0), (0.0, 1.0), raw.abs())
    }
}

/// Clamp an axis value into [-1, 1], zeroing NaN or infinite values.
pub fn sanitise_axis(value: f64) -> f64 {
    if value.is_finite() {
        value.max(-1.0).min(1.0)
    }
    else {
        0.0
    }
}

/// First live input source in priority order, if any.
pub fn select_live(inputs: &[RawInput]) -> Option<&RawInput> {
    inputs.iter().find(|i| i.live)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_condition() {
        let c = condition(0.5, 0.07);
        assert!((c - 0.43 / 0.93).abs() < 1e-12);
        assert!((c - 0.4624).abs() < 1e-4);

        assert_eq!(condition(0.05, 0.07), 0.0);
        assert_eq!(condition(-0.05, 0.07), 0.0);
        assert_eq!(condition(0.07, 0.07), 0.0);
        assert!((condition(1.0, 0.07) - 1.0).abs() < 1e-12);
        assert!((condition(-1.0, 0.07) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_continuous_at_edge() {
        for &d in [0.0, 0.07, 0.3, 0.9].iter() {
            let above = condition(d + 1e-9, d);
            assert!(above.abs() < 1e-6, "jump at deadband {}: {}", d, above);
        }
    }

    #[test]
    fn test_deadband_validation() {
        assert!(Deadband::new(0.0).is_ok());
        assert!(Deadband::new(0.07).is_ok());
        assert!(Deadband::new(1.0).is_err());
        assert!(Deadband::new(-0.1).is_err());
        assert!(Deadband::new(std::f64::NAN).is_err());
    }

    #[test]
    fn test_axis_map() {
        let map = AxisMap::default();
        let input = RawInput {
            live: true,
            axes: vec![0.25, -0.5, 3.0]
        };

        assert_eq!(map.read(&input), (0.5, -0.25));

        // Out of range and missing axes
        let map = AxisMap {
            speed_axis: 2,
            turn_axis: 7,
            invert_speed: false,
            invert_turn: false
        };
        assert_eq!(map.read(&input), (1.0, 0.0));

        let nan_input = RawInput {
            live: true,
            axes: vec![std::f64::NAN, std::f64::INFINITY]
        };
        assert_eq!(AxisMap::default().read(&nan_input), (0.0, 0.0));
    }

    #[test]
    fn test_select_live() {
        let inputs = vec![
            RawInput { live: false, axes: vec![1.0] },
            RawInput { live: true, axes: vec![0.5] },
            RawInput { live: true, axes: vec![0.2] },
        ];

        assert_eq!(select_live(&inputs), Some(&inputs[1]));
        assert_eq!(select_live(&inputs[..1]), None);
        assert_eq!(select_live(&[]), None);
    }
}
