use std::io::{self, Write};

use serde::Serialize;

use crate::dynamics::state::{pose_of, V1, Y1, Y2};
use crate::gnc::GuidanceTarget;
use crate::sim::{StopReason, Trajectory};

/// Summary statistics computed from a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub stop_time: f64,
    pub arrived: bool,
    pub samples: usize,
    pub path_length: f64,
    pub final_distance: f64,
    pub max_surge: f64,
}

impl RunSummary {
    /// Compute summary from trajectory data.
    pub fn from_trajectory(trajectory: &Trajectory, target: &GuidanceTarget) -> Self {
        let path_length = trajectory
            .samples
            .windows(2)
            .map(|w| {
                let (a, b) = (&w[0].state, &w[1].state);
                ((b[Y1] - a[Y1]).powi(2) + (b[Y2] - a[Y2]).powi(2)).sqrt()
            })
            .sum();

        let max_surge = trajectory
            .samples
            .iter()
            .map(|s| s.state[V1].abs())
            .fold(0.0_f64, f64::max);

        let final_distance = trajectory
            .final_state()
            .map_or(f64::NAN, |s| target.distance_sq(&pose_of(s)).sqrt());

        RunSummary {
            stop_time: trajectory.stop_time,
            arrived: trajectory.stop_reason == StopReason::Arrived,
            samples: trajectory.len(),
            path_length,
            final_distance,
            max_surge,
        }
    }
}

/// Write any serializable record as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

/// Write a serializable record to a JSON file.
pub fn write_json_file<T: Serialize + ?Sized>(path: &str, value: &T) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_json(&mut file, value)
}
