use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{Aquadron, VehicleParams, PSI, V1, Y1, Y2};
use crate::error::Result;
use crate::sim::Trajectory;

/// Initial pose, body rates and physical parameters of a new vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationRequest {
    /// `[Y1, Y2, psi]`
    pub coords_y: [f64; 3],
    /// `[v1, v2, r]`
    pub coords_x: [f64; 3],
    pub weight: f64,
    #[serde(rename = "J")]
    pub j: f64,
    pub cx1: f64,
    pub cx2: f64,
    pub mx3: f64,
    /// Constant disturbance force, zero when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disturbance: Option<[f64; 3]>,
}

impl InitializationRequest {
    pub fn params(&self) -> VehicleParams {
        VehicleParams {
            weight: self.weight,
            j: self.j,
            cx1: self.cx1,
            cx2: self.cx2,
            mx3: self.mx3,
        }
    }

    pub fn build(&self) -> Result<Aquadron> {
        let vehicle = Aquadron::new(
            Vector3::from(self.coords_y),
            Vector3::from(self.coords_x),
            self.params(),
        )?;
        Ok(match self.disturbance {
            Some(fv) => vehicle.with_disturbance(Vector3::from(fv)),
            None => vehicle,
        })
    }
}

fn default_max_time() -> f64 {
    100.0
}

fn default_step() -> f64 {
    0.01
}

/// Target and run horizon for one simulation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub target_y1: f64,
    pub target_y2: f64,
    /// Unsigned cruise speed; the session picks the sign.
    pub target_speed: f64,
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

impl SimulationRequest {
    pub fn new(target_y1: f64, target_y2: f64, target_speed: f64) -> Self {
        Self {
            target_y1,
            target_y2,
            target_speed,
            max_time: default_max_time(),
            step: default_step(),
        }
    }
}

/// Per-sample columns of a finished run, aligned index-for-index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    /// `[Y1, Y2]` per sample.
    pub coordinates: Vec<[f64; 2]>,
    /// Surge velocity `v1` per sample.
    pub speed: Vec<f64>,
    /// Heading `psi` per sample.
    pub angle: Vec<f64>,
    pub stop_time: f64,
}

impl SimulationResults {
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let samples = &trajectory.samples;
        Self {
            coordinates: samples.iter().map(|s| [s.state[Y1], s.state[Y2]]).collect(),
            speed: samples.iter().map(|s| s.state[V1]).collect(),
            angle: samples.iter().map(|s| s.state[PSI]).collect(),
            stop_time: trajectory.stop_time,
        }
    }
}

/// Current pose, rates and parameters of a stored vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub y: [f64; 3],
    pub x: [f64; 3],
    pub weight: f64,
    #[serde(rename = "J")]
    pub j: f64,
    pub cx1: f64,
    pub cx2: f64,
    pub mx3: f64,
}

impl From<&Aquadron> for StateSnapshot {
    fn from(v: &Aquadron) -> Self {
        let p = v.params();
        Self {
            y: v.y.into(),
            x: v.x.into(),
            weight: p.weight,
            j: p.j,
            cx1: p.cx1,
            cx2: p.cx2,
            mx3: p.mx3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::StateVector;
    use crate::sim::{Sample, StopReason};

    fn request() -> InitializationRequest {
        InitializationRequest {
            coords_y: [1.0, 2.0, 0.5],
            coords_x: [0.1, 0.0, 0.0],
            weight: 10.0,
            j: 1.0,
            cx1: 1.0,
            cx2: 1.0,
            mx3: 1.0,
            disturbance: None,
        }
    }

    #[test]
    fn results_columns_follow_state_layout() {
        // Distinct value in every slot so a column mix-up cannot pass.
        let s = StateVector::new(11.0, 12.0, 13.0, 14.0, 15.0, 16.0);
        let traj = Trajectory {
            samples: vec![
                Sample { time: 0.0, state: StateVector::zeros() },
                Sample { time: 0.01, state: s },
            ],
            stop_time: 0.01,
            stop_reason: StopReason::Arrived,
        };
        let r = SimulationResults::from_trajectory(&traj);
        assert_eq!(r.coordinates, vec![[0.0, 0.0], [11.0, 12.0]]);
        assert_eq!(r.angle, vec![0.0, 13.0]);
        assert_eq!(r.speed, vec![0.0, 14.0]);
        assert_eq!(r.stop_time, 0.01);
    }

    #[test]
    fn initialization_request_uses_wire_names() {
        let json = r#"{
            "coordsY": [1.0, 2.0, 0.5],
            "coordsX": [0.1, 0.0, 0.0],
            "weight": 10.0, "J": 1.0, "cx1": 1.0, "cx2": 1.0, "mx3": 1.0
        }"#;
        let parsed: InitializationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, request());
    }

    #[test]
    fn initialization_rejects_wrong_vector_length() {
        let json = r#"{
            "coordsY": [1.0, 2.0],
            "coordsX": [0.1, 0.0, 0.0],
            "weight": 10.0, "J": 1.0, "cx1": 1.0, "cx2": 1.0, "mx3": 1.0
        }"#;
        assert!(serde_json::from_str::<InitializationRequest>(json).is_err());
    }

    #[test]
    fn simulation_request_defaults() {
        let req: SimulationRequest =
            serde_json::from_str(r#"{"targetY1": 10, "targetY2": 10, "targetSpeed": 0.7}"#).unwrap();
        assert_eq!(req, SimulationRequest::new(10.0, 10.0, 0.7));
        assert_eq!(req.max_time, 100.0);
        assert_eq!(req.step, 0.01);
    }

    #[test]
    fn snapshot_mirrors_vehicle() {
        let v = request().build().unwrap();
        let snap = StateSnapshot::from(&v);
        assert_eq!(snap.y, [1.0, 2.0, 0.5]);
        assert_eq!(snap.x, [0.1, 0.0, 0.0]);
        assert_eq!(snap.j, 1.0);
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("J").is_some());
    }

    #[test]
    fn build_applies_disturbance() {
        let req = InitializationRequest { disturbance: Some([0.0, 0.3, 0.0]), ..request() };
        let v = req.build().unwrap();
        assert_eq!(v.fv, Vector3::new(0.0, 0.3, 0.0));
    }
}
