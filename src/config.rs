use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{InitializationRequest, SimulationRequest};
use crate::gnc::{BearingMode, ControlGains, FeedbackLinearization};
use crate::sim::SimConfig;

// ---------------------------------------------------------------------------
// TOML scenario file
// ---------------------------------------------------------------------------

/// One complete scenario: vehicle, target and run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub vehicle: InitializationRequest,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub control: ControlGains,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub y1: f64,
    pub y2: f64,
    pub speed: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { y1: 10.0, y2: 10.0, speed: 0.7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub max_time: f64,
    pub step: f64,
    pub arrival_tolerance: f64,
    pub bearing: BearingMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            max_time: sim.max_time,
            step: sim.dt,
            arrival_tolerance: sim.arrival_tolerance,
            bearing: BearingMode::default(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            vehicle: InitializationRequest {
                coords_y: [0.0, 0.0, 0.0],
                coords_x: [0.0, 0.0, 0.0],
                weight: 10.0,
                j: 1.0,
                cx1: 1.0,
                cx2: 1.0,
                mx3: 1.0,
                disturbance: None,
            },
            target: TargetConfig::default(),
            run: RunConfig::default(),
            control: ControlGains::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn simulation_request(&self) -> SimulationRequest {
        SimulationRequest {
            target_y1: self.target.y1,
            target_y2: self.target.y2,
            target_speed: self.target.speed,
            max_time: self.run.max_time,
            step: self.run.step,
        }
    }

    pub fn law(&self) -> FeedbackLinearization {
        FeedbackLinearization::new(self.control, self.run.bearing)
    }
}

pub fn parse_config(text: &str) -> Result<ScenarioConfig> {
    toml::from_str(text).context("invalid scenario file")
}

pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    parse_config(&text)
}
