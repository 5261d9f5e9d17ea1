use std::fmt;
use std::str::FromStr;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Guidance: target point, commanded speed and desired heading
// ---------------------------------------------------------------------------

/// Point to reach and the surge speed to hold on the way. Fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceTarget {
    pub point: Vector2<f64>,
    /// Signed surge speed, m/s. Negative means reverse toward the point.
    pub speed: f64,
}

impl GuidanceTarget {
    pub fn new(point: Vector2<f64>, speed: f64) -> Self {
        Self { point, speed }
    }

    /// Squared planar distance from `pose` to the target point.
    pub fn distance_sq(&self, pose: &Vector3<f64>) -> f64 {
        (pose.x - self.point.x).powi(2) + (pose.y - self.point.y).powi(2)
    }
}

/// How the desired heading toward the target is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BearingMode {
    /// `-atan(d2 / d1)`: folds the bearing into (-pi/2, pi/2). Targets behind
    /// the vehicle are reached by reversing, see [`approach_speed`].
    #[default]
    Raw,
    /// `-atan2(d2, d1)`: full four-quadrant bearing.
    Quadrant,
}

impl fmt::Display for BearingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BearingMode::Raw => write!(f, "raw"),
            BearingMode::Quadrant => write!(f, "quadrant"),
        }
    }
}

impl FromStr for BearingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(BearingMode::Raw),
            "quadrant" => Ok(BearingMode::Quadrant),
            other => Err(format!("unknown bearing mode '{}' (expected raw|quadrant)", other)),
        }
    }
}

/// Desired heading from `pose` toward `point`.
///
/// With zero offset the bearing is undefined and the current heading is held.
pub fn desired_heading(pose: &Vector3<f64>, point: &Vector2<f64>, mode: BearingMode) -> f64 {
    let d1 = point.x - pose.x;
    let d2 = point.y - pose.y;
    if d1 == 0.0 && d2 == 0.0 {
        return pose.z;
    }
    match mode {
        BearingMode::Raw => -(d2 / d1).atan(),
        BearingMode::Quadrant => -d2.atan2(d1),
    }
}

/// Signed speed command for a run starting at `current_y1`.
///
/// Under [`BearingMode::Raw`] the heading always faces +Y1, so a target with
/// smaller Y1 is approached in reverse.
pub fn approach_speed(current_y1: f64, target_y1: f64, speed: f64, mode: BearingMode) -> f64 {
    match mode {
        BearingMode::Raw if current_y1 > target_y1 => -speed,
        _ => speed,
    }
}
