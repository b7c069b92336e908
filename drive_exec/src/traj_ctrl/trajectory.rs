//! # Trajectory
//!
//! An immutable, time ordered sequence of samples produced by a path
//! generator, and the sampling rule used to look up the reference state at
//! an arbitrary time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::path::Path;

// Internal
use super::TrajCtrlError;
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of a trajectory.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrajectorySample {
    /// Time since the start of the trajectory.
    ///
    /// Units: seconds
    pub time_s: f64,

    pub pose: Pose,

    /// Units: meters/second
    pub velocity_ms: f64,

    /// Units: meters/second^2
    pub acceleration_mss: f64,

    /// Units: radians/meter
    pub curvature_radpm: f64
}

/// A trajectory, at least one sample long with strictly increasing sample
/// times.
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>
}

/// A sample as written by path generators (PathWeaver's JSON format).
#[derive(Deserialize)]
struct JsonSample {
    time: f64,
    velocity: f64,
    acceleration: f64,
    pose: JsonPose,
    curvature: f64
}

#[derive(Deserialize)]
struct JsonPose {
    translation: JsonTranslation,
    rotation: JsonRotation
}

#[derive(Deserialize)]
struct JsonTranslation {
    x: f64,
    y: f64
}

#[derive(Deserialize)]
struct JsonRotation {
    radians: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectorySample {

    /// Angular velocity of the reference.
    ///
    /// Units: radians/second
    pub fn angular_velocity_rads(&self) -> f64 {
        self.velocity_ms * self.curvature_radpm
    }

    fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.pose.is_finite()
            && self.velocity_ms.is_finite()
            && self.acceleration_mss.is_finite()
            && self.curvature_radpm.is_finite()
    }

    /// Interpolate towards `end` assuming constant acceleration, `frac` being
    /// the fraction of the time between the two samples.
    fn interpolate(&self, end: &TrajectorySample, frac: f64) -> TrajectorySample {
        let time_s = lerp(self.time_s, end.time_s, frac);
        let dt = time_s - self.time_s;

        if dt < 0.0 {
            return end.interpolate(self, 1.0 - frac)
        }

        let reversing = self.velocity_ms < 0.0
            || (self.velocity_ms.abs() < 1e-9 && end.velocity_ms < 0.0);

        let velocity_ms = self.velocity_ms + self.acceleration_mss * dt;

        let mut dist_m = self.velocity_ms * dt
            + 0.5 * self.acceleration_mss * dt.powi(2);
        if reversing {
            dist_m = -dist_m;
        }

        // Poses are interpolated by distance travelled rather than time
        let seg_len_m = self.pose.distance_to(&end.pose);
        let pose_frac = if seg_len_m > 1e-9 {
            dist_m / seg_len_m
        }
        else {
            frac
        };

        TrajectorySample {
            time_s,
            pose: self.pose.interpolate(&end.pose, pose_frac),
            velocity_ms,
            acceleration_mss: self.acceleration_mss,
            curvature_radpm: lerp(self.curvature_radpm, end.curvature_radpm, frac)
        }
    }
}

impl Trajectory {

    /// Create a new trajectory from a set of samples.
    ///
    /// Fails if there are no samples, if any value isn't finite, or if the
    /// sample times aren't strictly increasing.
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self, TrajCtrlError> {
        if samples.is_empty() {
            return Err(TrajCtrlError::EmptyTrajectory)
        }

        for (i, s) in samples.iter().enumerate() {
            if !s.is_finite() {
                return Err(TrajCtrlError::NonFiniteSample(i))
            }
            if i > 0 && s.time_s <= samples[i - 1].time_s {
                return Err(TrajCtrlError::NonMonotonicTime(i))
            }
        }

        Ok(Self { samples })
    }

    /// Parse a trajectory from a JSON array of generator samples.
    pub fn from_json(json: &str) -> Result<Self, TrajCtrlError> {
        let raw: Vec<JsonSample> = serde_json::from_str(json)?;

        Self::new(raw.into_iter().map(|s| TrajectorySample {
            time_s: s.time,
            pose: Pose::new(
                s.pose.translation.x,
                s.pose.translation.y,
                s.pose.rotation.radians
            ),
            velocity_ms: s.velocity,
            acceleration_mss: s.acceleration,
            curvature_radpm: s.curvature
        }).collect())
    }

    /// Load a trajectory from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrajCtrlError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TrajCtrlError::TrajectoryLoadError(
                path.as_ref().to_path_buf(), e
            ))?;

        Self::from_json(&json)
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Time of the last sample.
    ///
    /// Units: seconds
    pub fn total_time_s(&self) -> f64 {
        self.last().time_s
    }

    pub fn initial_pose(&self) -> Pose {
        self.samples[0].pose
    }

    /// The same trajectory with every pose expressed relative to `zero_pose`.
    pub fn relative_to(&self, zero_pose: &Pose) -> Trajectory {
        Trajectory {
            samples: self.samples.iter().map(|s| TrajectorySample {
                pose: s.pose.relative_to(zero_pose),
                ..*s
            }).collect()
        }
    }

    /// The reference state at `time_s`.
    ///
    /// Times before the start or after the end are clamped to the first or
    /// last sample.
    pub fn sample(&self, time_s: f64) -> TrajectorySample {
        let first = &self.samples[0];
        if time_s <= first.time_s {
            return *first
        }
        if time_s >= self.last().time_s {
            return *self.last()
        }

        // Index of the first sample at or after time_s. The checks above
        // guarantee this is in 1..len.
        let idx = self.samples.partition_point(|s| s.time_s < time_s);

        let prev = &self.samples[idx - 1];
        let next = &self.samples[idx];

        prev.interpolate(next, (time_s - prev.time_s) / (next.time_s - prev.time_s))
    }

    fn last(&self) -> &TrajectorySample {
        &self.samples[self.samples.len() - 1]
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a + (b - a) * frac
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Straight line along x, accelerating at 1 m/s^2 from rest for 2 s.
    fn straight() -> Trajectory {
        let samples = (0..=4).map(|i| {
            let t = i as f64 * 0.5;
            TrajectorySample {
                time_s: t,
                pose: Pose::new(0.5 * t * t, 0.0, 0.0),
                velocity_ms: t,
                acceleration_mss: 1.0,
                curvature_radpm: 0.0
            }
        }).collect();

        Trajectory::new(samples).unwrap()
    }

    #[test]
    fn test_sample_clamps() {
        let traj = straight();

        assert_eq!(traj.sample(-1.0), traj.samples()[0]);
        assert_eq!(traj.sample(10.0), traj.samples()[4]);
        assert_eq!(traj.total_time_s(), 2.0);
    }

    #[test]
    fn test_sample_interpolates_constant_accel() {
        let traj = straight();

        let s = traj.sample(0.75);
        assert!((s.time_s - 0.75).abs() < 1e-12);
        assert!((s.velocity_ms - 0.75).abs() < 1e-12);
        assert!((s.pose.x() - 0.5 * 0.75 * 0.75).abs() < 1e-12);
        assert!(s.pose.y().abs() < 1e-12);

        // Exactly on a sample
        let s = traj.sample(1.0);
        assert!((s.pose.x() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_relative_to() {
        let traj = straight().relative_to(&Pose::new(1.0, 0.0, 0.0));

        assert!((traj.initial_pose().x() + 1.0).abs() < 1e-12);
        assert_eq!(traj.samples()[2].velocity_ms, 1.0);
    }

    #[test]
    fn test_invalid_trajectories() {
        assert!(matches!(
            Trajectory::new(vec![]),
            Err(TrajCtrlError::EmptyTrajectory)
        ));

        let mut samples = straight().samples().to_vec();
        samples[3].time_s = 0.2;
        assert!(matches!(
            Trajectory::new(samples),
            Err(TrajCtrlError::NonMonotonicTime(3))
        ));

        let mut samples = straight().samples().to_vec();
        samples[1].velocity_ms = std::f64::NAN;
        assert!(matches!(
            Trajectory::new(samples),
            Err(TrajCtrlError::NonFiniteSample(1))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"acceleration": 0.0, "curvature": 0.0,
             "pose": {"rotation": {"radians": 0.0}, "translation": {"x": 0.0, "y": 0.0}},
             "time": 0.0, "velocity": 1.0},
            {"acceleration": 0.0, "curvature": 0.5,
             "pose": {"rotation": {"radians": 0.1}, "translation": {"x": 1.0, "y": 0.05}},
             "time": 1.0, "velocity": 1.0}
        ]"#;

        let traj = Trajectory::from_json(json).unwrap();
        assert_eq!(traj.samples().len(), 2);
        assert_eq!(traj.total_time_s(), 1.0);
        assert_eq!(traj.samples()[1].angular_velocity_rads(), 0.5);

        assert!(matches!(
            Trajectory::from_json("{\"not\": \"an array\"}"),
            Err(TrajCtrlError::TrajectoryParseError(_))
        ));
    }
}
