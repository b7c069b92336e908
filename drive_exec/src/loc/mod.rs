//! # Localisation types
//!
//! Pose of the robot on the field, and the rigid body operations the
//! controllers need on it. Poses are produced by odometry outside of this
//! library and are only ever read by the controllers.
//!
//! Frame convention: x forwards (away from the driver station wall), y to the
//! left, heading measured anticlockwise from +x and wrapped to (-pi, pi].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// Internal
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading) of the robot in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the robot centre.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading of the robot, wrapped to (-pi, pi].
    ///
    /// Units: radians
    pub heading_rad: f64
}

/// A rigid transform: a translation followed by a rotation, expressed in the
/// frame of the pose it is applied to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation_m: Vector2<f64>,
    pub rotation_rad: f64
}

/// A change in pose along a constant curvature arc, expressed in the frame of
/// the starting pose.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Twist {
    pub dx_m: f64,
    pub dy_m: f64,
    pub dtheta_rad: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose {
    fn default() -> Self {
        Self {
            position_m: Vector2::zeros(),
            heading_rad: 0.0
        }
    }
}

impl From<[f64; 3]> for Pose {
    fn from(p: [f64; 3]) -> Self {
        Pose::new(p[0], p[1], p[2])
    }
}

impl Pose {

    /// Create a new pose, wrapping the heading.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: wrap_pi(heading_rad)
        }
    }

    pub fn x(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y(&self) -> f64 {
        self.position_m[1]
    }

    /// True if every component of the pose is finite.
    pub fn is_finite(&self) -> bool {
        self.position_m.iter().all(|v| v.is_finite())
            && self.heading_rad.is_finite()
    }

    /// Express this pose in the frame of `other`.
    pub fn relative_to(&self, other: &Pose) -> Pose {
        let transform = *self - *other;

        Pose::new(
            transform.translation_m[0],
            transform.translation_m[1],
            transform.rotation_rad
        )
    }

    /// Apply a transform expressed in this pose's frame.
    pub fn transform_by(&self, transform: &Transform) -> Pose {
        let position_m = self.position_m
            + rotate(&transform.translation_m, self.heading_rad);

        Pose::new(
            position_m[0],
            position_m[1],
            self.heading_rad + transform.rotation_rad
        )
    }

    /// Follow a twist from this pose.
    pub fn exp(&self, twist: &Twist) -> Pose {
        let (sin_theta, cos_theta) = twist.dtheta_rad.sin_cos();

        let (s, c) = if twist.dtheta_rad.abs() < 1e-9 {
            (
                1.0 - twist.dtheta_rad.powi(2) / 6.0,
                0.5 * twist.dtheta_rad
            )
        }
        else {
            (
                sin_theta / twist.dtheta_rad,
                (1.0 - cos_theta) / twist.dtheta_rad
            )
        };

        self.transform_by(&Transform {
            translation_m: Vector2::new(
                twist.dx_m * s - twist.dy_m * c,
                twist.dx_m * c + twist.dy_m * s
            ),
            rotation_rad: twist.dtheta_rad
        })
    }

    /// The twist which takes this pose to `end`.
    pub fn log(&self, end: &Pose) -> Twist {
        let transform = *end - *self;
        let dtheta = transform.rotation_rad;
        let half_dtheta = dtheta / 2.0;
        let cos_minus_one = dtheta.cos() - 1.0;

        let half_theta_by_tan_half_dtheta = if cos_minus_one.abs() < 1e-9 {
            1.0 - dtheta.powi(2) / 12.0
        }
        else {
            -(half_dtheta * dtheta.sin()) / cos_minus_one
        };

        let translation = rotate(
                &transform.translation_m,
                (-half_dtheta).atan2(half_theta_by_tan_half_dtheta)
            )
            * half_theta_by_tan_half_dtheta.hypot(half_dtheta);

        Twist {
            dx_m: translation[0],
            dy_m: translation[1],
            dtheta_rad: dtheta
        }
    }

    /// Interpolate along the constant curvature arc between this pose and
    /// `end`, with `frac` in [0, 1].
    pub fn interpolate(&self, end: &Pose, frac: f64) -> Pose {
        if frac <= 0.0 {
            return *self
        }
        if frac >= 1.0 {
            return *end
        }

        let twist = self.log(end);
        self.exp(&Twist {
            dx_m: twist.dx_m * frac,
            dy_m: twist.dy_m * frac,
            dtheta_rad: twist.dtheta_rad * frac
        })
    }

    /// Straight line distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (self.position_m - other.position_m).norm()
    }
}

impl Add<Transform> for Pose {
    type Output = Pose;

    fn add(self, transform: Transform) -> Pose {
        self.transform_by(&transform)
    }
}

/// `a - b` is the transform which takes `b` to `a`.
impl Sub<Pose> for Pose {
    type Output = Transform;

    fn sub(self, other: Pose) -> Transform {
        Transform {
            translation_m: rotate(
                &(self.position_m - other.position_m),
                -other.heading_rad
            ),
            rotation_rad: wrap_pi(self.heading_rad - other.heading_rad)
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotate a vector anticlockwise by `angle_rad`.
pub fn rotate(v: &Vector2<f64>, angle_rad: f64) -> Vector2<f64> {
    let (s, c) = angle_rad.sin_cos();
    Vector2::new(
        v[0] * c - v[1] * s,
        v[0] * s + v[1] * c
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn assert_pose_eq(a: &Pose, b: &Pose) {
        assert!((a.x() - b.x()).abs() < 1e-9, "{:?} != {:?}", a, b);
        assert!((a.y() - b.y()).abs() < 1e-9, "{:?} != {:?}", a, b);
        assert!(
            wrap_pi(a.heading_rad - b.heading_rad).abs() < 1e-9,
            "{:?} != {:?}", a, b
        );
    }

    #[test]
    fn test_relative_to() {
        let origin = Pose::new(1.0, 1.0, PI / 2.0);
        let p = Pose::new(1.0, 3.0, PI / 2.0);

        // Two meters straight ahead of a robot facing +y
        assert_pose_eq(&p.relative_to(&origin), &Pose::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_round_trip() {
        let a = Pose::new(0.3, -1.2, 2.5);
        let b = Pose::new(-4.0, 0.7, -1.1);

        assert_pose_eq(&(a + (b - a)), &b);
    }

    #[test]
    fn test_exp() {
        let start = Pose::default();

        let straight = start.exp(&Twist {
            dx_m: 2.0, dy_m: 0.0, dtheta_rad: 0.0
        });
        assert_pose_eq(&straight, &Pose::new(2.0, 0.0, 0.0));

        // Quarter circle of radius 1 to the left
        let arc = start.exp(&Twist {
            dx_m: PI / 2.0, dy_m: 0.0, dtheta_rad: PI / 2.0
        });
        assert_pose_eq(&arc, &Pose::new(1.0, 1.0, PI / 2.0));
    }

    #[test]
    fn test_log_inverts_exp() {
        let start = Pose::new(1.0, -2.0, 0.4);
        let end = Pose::new(3.0, 0.5, 1.9);

        let twist = start.log(&end);
        assert_pose_eq(&start.exp(&twist), &end);
    }

    #[test]
    fn test_interpolate() {
        let start = Pose::default();
        let end = Pose::new(1.0, 1.0, PI / 2.0);

        let mid = start.interpolate(&end, 0.5);
        let expected = Pose::new(
            (PI / 4.0).sin(),
            1.0 - (PI / 4.0).cos(),
            PI / 4.0
        );

        assert_pose_eq(&mid, &expected);
        assert_pose_eq(&start.interpolate(&end, -1.0), &start);
        assert_pose_eq(&start.interpolate(&end, 2.0), &end);
    }

    #[test]
    fn test_is_finite() {
        let bad = Pose {
            position_m: Vector2::new(std::f64::NAN, 1.0),
            heading_rad: 0.2
        };
        assert!(!bad.is_finite());
        assert!(Pose::new(1.0, 2.0, 0.3).is_finite());
    }
}
