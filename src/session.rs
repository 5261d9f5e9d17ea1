use std::collections::HashMap;

use nalgebra::Vector2;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::api::{InitializationRequest, SimulationRequest, SimulationResults, StateSnapshot};
use crate::dynamics::state::Aquadron;
use crate::error::{Result, SimError};
use crate::gnc::{approach_speed, FeedbackLinearization, GuidanceTarget};
use crate::sim::{simulate_with, SimConfig, Trajectory};

// ---------------------------------------------------------------------------
// Session store: one isolated vehicle per session id
// ---------------------------------------------------------------------------

/// Owns every live vehicle, keyed by session.
///
/// A run works on a copy of the session's vehicle outside the lock, then the
/// vehicle is advanced to the run's final sample so the next call continues
/// from where the previous one stopped.
#[derive(Debug, Default)]
pub struct SessionStore {
    vehicles: RwLock<HashMap<Uuid, Aquadron>>,
    law: FeedbackLinearization,
    arrival_tolerance: Option<f64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that runs every simulation with `law`.
    pub fn with_law(law: FeedbackLinearization) -> Self {
        Self { law, ..Self::default() }
    }

    /// Override the squared arrival radius for every run.
    pub fn with_arrival_tolerance(mut self, tolerance: f64) -> Self {
        self.arrival_tolerance = Some(tolerance);
        self
    }

    pub fn create(&self, request: &InitializationRequest) -> Result<Uuid> {
        let vehicle = request.build()?;
        let id = Uuid::new_v4();
        self.vehicles.write().insert(id, vehicle);
        info!(%id, weight = request.weight, j = request.j, "Vehicle created");
        Ok(id)
    }

    /// Run one simulation for session `id` and return the full trajectory.
    pub fn run(&self, id: Uuid, request: &SimulationRequest) -> Result<Trajectory> {
        let vehicle = self.vehicle(id)?;

        let speed = approach_speed(vehicle.y.x, request.target_y1, request.target_speed, self.law.bearing);
        let target = GuidanceTarget::new(Vector2::new(request.target_y1, request.target_y2), speed);
        let config = SimConfig {
            dt: request.step,
            max_time: request.max_time,
            arrival_tolerance: self.arrival_tolerance.unwrap_or(SimConfig::default().arrival_tolerance),
        };

        let trajectory = simulate_with(&vehicle, target, &config, &self.law)?;

        if let Some(last) = trajectory.final_state() {
            let mut vehicles = self.vehicles.write();
            let stored = vehicles.get_mut(&id).ok_or(SimError::UninitializedState(id))?;
            stored.set_state(last);
        }
        Ok(trajectory)
    }

    pub fn simulate(&self, id: Uuid, request: &SimulationRequest) -> Result<SimulationResults> {
        self.run(id, request).map(|t| SimulationResults::from_trajectory(&t))
    }

    pub fn state(&self, id: Uuid) -> Result<StateSnapshot> {
        self.vehicles
            .read()
            .get(&id)
            .map(StateSnapshot::from)
            .ok_or(SimError::UninitializedState(id))
    }

    /// Copy of the stored vehicle for session `id`.
    pub fn vehicle(&self, id: Uuid) -> Result<Aquadron> {
        self.vehicles.read().get(&id).cloned().ok_or(SimError::UninitializedState(id))
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.vehicles
            .write()
            .remove(&id)
            .map(|_| info!(%id, "Vehicle removed"))
            .ok_or(SimError::UninitializedState(id))
    }

    pub fn len(&self) -> usize {
        self.vehicles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.read().is_empty()
    }
}
