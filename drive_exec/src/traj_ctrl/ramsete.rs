//! # Ramsete pose tracking
//!
//! Nonlinear feedback law for a unicycle. Given the reference pose and
//! velocities and the measured pose, produces the chassis velocity which
//! drives the pose error to zero while keeping the reference velocities as
//! the nominal command.
//!
//! Gains:
//! - `b` (> 0) behaves like a proportional term, larger values converge more
//!   aggressively.
//! - `zeta` (in (0, 1)) behaves like a damping term.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::TrajCtrlError;
use crate::kinematics::ChassisVelocity;
use crate::loc::Pose;
use util::maths::sinc;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ramsete {
    b: f64,
    zeta: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Pose feedback applied by the trajectory follower.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PoseFeedback {
    /// Correct pose error with a Ramsete controller.
    Ramsete(Ramsete),

    /// Pass the reference velocities through untouched, for when the pose
    /// estimate isn't trusted.
    Disabled
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Ramsete {

    pub const DEFAULT_B: f64 = 2.0;
    pub const DEFAULT_ZETA: f64 = 0.7;

    pub fn new(b: f64, zeta: f64) -> Result<Self, TrajCtrlError> {
        if !(b.is_finite() && b > 0.0 && zeta > 0.0 && zeta < 1.0) {
            return Err(TrajCtrlError::InvalidRamseteGains(b, zeta))
        }

        Ok(Self { b, zeta })
    }

    pub fn calculate(
        &self,
        current: &Pose,
        pose_ref: &Pose,
        linear_ref_ms: f64,
        angular_ref_rads: f64
    ) -> ChassisVelocity {
        let error = pose_ref.relative_to(current);
        let (e_x, e_y, e_theta) = (error.x(), error.y(), error.heading_rad);

        let k = 2.0 * self.zeta
            * (angular_ref_rads.powi(2) + self.b * linear_ref_ms.powi(2)).sqrt();

        ChassisVelocity {
            linear_ms: linear_ref_ms * e_theta.cos() + k * e_x,
            angular_rads: angular_ref_rads
                + k * e_theta
                + self.b * linear_ref_ms * sinc(e_theta) * e_y
        }
    }
}

impl Default for Ramsete {
    fn default() -> Self {
        Self {
            b: Self::DEFAULT_B,
            zeta: Self::DEFAULT_ZETA
        }
    }
}

impl PoseFeedback {
    pub fn calculate(
        &self,
        current: &Pose,
        pose_ref: &Pose,
        linear_ref_ms: f64,
        angular_ref_rads: f64
    ) -> ChassisVelocity {
        match self {
            PoseFeedback::Ramsete(r) => r.calculate(
                current, pose_ref, linear_ref_ms, angular_ref_rads
            ),
            PoseFeedback::Disabled => ChassisVelocity {
                linear_ms: linear_ref_ms,
                angular_rads: angular_ref_rads
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
