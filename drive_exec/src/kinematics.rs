//! # Differential drive kinematics
//!
//! Conversions between chassis velocity and the speeds of the two drive
//! sides, and the normaliser shared by every open loop commander.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity of the chassis in its own frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChassisVelocity {
    /// Units: meters/second
    pub linear_ms: f64,

    /// Anticlockwise positive.
    ///
    /// Units: radians/second
    pub angular_rads: f64
}

/// Speed of each side of the drivetrain.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    /// Units: meters/second
    pub left_ms: f64,

    /// Units: meters/second
    pub right_ms: f64
}

/// Fixed geometry of a differential drivetrain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiffDriveKinematics {
    track_width_m: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("Track width must be positive and finite, got {0} m")]
    InvalidTrackWidth(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiffDriveKinematics {

    /// Create a new kinematics model, rejecting non-positive track widths.
    pub fn new(track_width_m: f64) -> Result<Self, KinematicsError> {
        if !(track_width_m.is_finite() && track_width_m > 0.0) {
            return Err(KinematicsError::InvalidTrackWidth(track_width_m))
        }

        Ok(Self { track_width_m })
    }

    /// Wheel speeds needed to achieve the given chassis velocity.
    pub fn to_wheel_speeds(&self, chassis: &ChassisVelocity) -> WheelSpeeds {
        let half_track = self.track_width_m / 2.0;

        WheelSpeeds {
            left_ms: chassis.linear_ms - half_track * chassis.angular_rads,
            right_ms: chassis.linear_ms + half_track * chassis.angular_rads
        }
    }

    /// Chassis velocity produced by the given wheel speeds.
    pub fn to_chassis(&self, wheels: &WheelSpeeds) -> ChassisVelocity {
        ChassisVelocity {
            linear_ms: (wheels.left_ms + wheels.right_ms) / 2.0,
            angular_rads: (wheels.right_ms - wheels.left_ms) / self.track_width_m
        }
    }
}

impl WheelSpeeds {
    pub fn new(left_ms: f64, right_ms: f64) -> Self {
        Self { left_ms, right_ms }
    }

    /// Both speeds finite.
    pub fn is_finite(&self) -> bool {
        self.left_ms.is_finite() && self.right_ms.is_finite()
    }

    /// Scale both sides down by the same factor so that neither exceeds
    /// `max_ms` in magnitude.
    pub fn desaturate(&self, max_ms: f64) -> Self {
        let largest = self.left_ms.abs().max(self.right_ms.abs());

        if largest > max_ms {
            let factor = max_ms / largest;
            Self {
                left_ms: self.left_ms * factor,
                right_ms: self.right_ms * factor
            }
        }
        else {
            *self
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Normalise a pair of (left, right) demands so that neither exceeds unit
/// magnitude, preserving their ratio.
///
/// Pairs which already fit are returned unchanged.
pub fn normalise(left: f64, right: f64) -> (f64, f64) {
    let m = 1f64.max(left.abs()).max(right.abs());

    (left / m, right / m)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalise() {
        let (l, r) = normalise(1.5, 0.9);
        assert!((l - 1.0).abs() < 1e-12);
        assert!((r - 0.6).abs() < 1e-12);

        // Below saturation nothing changes
        assert_eq!(normalise(0.3, -0.8), (0.3, -0.8));
        assert_eq!(normalise(-1.0, 1.0), (-1.0, 1.0));
    }

    #[test]
    fn test_normalise_preserves_ratio() {
        let pairs = [(3.0, -1.0), (-2.5, -5.0), (1.2, 1.1), (0.0, -7.0)];

        for &(l, r) in pairs.iter() {
            let (nl, nr) = normalise(l, r);

            assert!(nl.abs() <= 1.0 && nr.abs() <= 1.0);
            assert!((nl * r - nr * l).abs() < 1e-12, "{} {} -> {} {}", l, r, nl, nr);
        }
    }

    #[test]
    fn test_to_wheel_speeds() {
        let kin = DiffDriveKinematics::new(0.6).unwrap();

        let straight = kin.to_wheel_speeds(&ChassisVelocity {
            linear_ms: 2.0,
            angular_rads: 0.0
        });
        assert_eq!(straight, WheelSpeeds::new(2.0, 2.0));

        let spin = kin.to_wheel_speeds(&ChassisVelocity {
            linear_ms: 0.0,
            angular_rads: 1.0
        });
        assert!((spin.left_ms + 0.3).abs() < 1e-12);
        assert!((spin.right_ms - 0.3).abs() < 1e-12);

        let chassis = kin.to_chassis(&spin);
        assert!(chassis.linear_ms.abs() < 1e-12);
        assert!((chassis.angular_rads - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_track_width() {
        assert!(DiffDriveKinematics::new(0.0).is_err());
        assert!(DiffDriveKinematics::new(-0.5).is_err());
        assert!(DiffDriveKinematics::new(std::f64::NAN).is_err());
    }

    #[test]
    fn test_desaturate() {
        let ws = WheelSpeeds::new(4.0, -2.0).desaturate(2.0);
        assert_eq!(ws, WheelSpeeds::new(2.0, -1.0));

        let ws = WheelSpeeds::new(1.0, -0.5).desaturate(2.0);
        assert_eq!(ws, WheelSpeeds::new(1.0, -0.5));
    }
}
