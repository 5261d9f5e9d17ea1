use tracing::{info, warn};

use crate::dynamics::state::{Aquadron, StateVector};
use crate::dynamics::vector_field::derivatives;
use crate::error::{Result, SimError};
use crate::gnc::{Controller, FeedbackLinearization, GuidanceTarget};
use super::event::{locate_crossing, ArrivalDetector, EventDetector, StopReason};
use super::integrator::{rk4_step, StepSchedule};

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub dt: f64,                // s
    pub max_time: f64,          // s
    pub arrival_tolerance: f64, // m^2, squared radius of the arrival disk
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            max_time: 100.0,
            arrival_tolerance: 1e-2,
        }
    }
}

// ---------------------------------------------------------------------------
// Trajectory record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub state: StateVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Initial state followed by one sample per accepted step.
    pub samples: Vec<Sample>,
    pub stop_time: f64,
    pub stop_reason: StopReason,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn final_state(&self) -> Option<&StateVector> {
        self.samples.last().map(|s| &s.state)
    }
}

// ---------------------------------------------------------------------------
// Step-by-step driver
// ---------------------------------------------------------------------------

/// Result of advancing one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub sample: Sample,
    /// `Some` once the run is over; no further steps will be taken.
    pub terminated: Option<StopReason>,
}

/// Advances one run a step at a time. Owns its working state exclusively.
pub struct Stepper<'a> {
    vehicle: &'a Aquadron,
    target: GuidanceTarget,
    controller: &'a dyn Controller,
    detector: ArrivalDetector,
    schedule: StepSchedule,
    k: usize,
    current: Sample,
    finished: Option<StopReason>,
}

impl<'a> Stepper<'a> {
    pub fn new(
        vehicle: &'a Aquadron,
        target: GuidanceTarget,
        config: &SimConfig,
        controller: &'a dyn Controller,
    ) -> Result<Self> {
        if !(config.arrival_tolerance.is_finite() && config.arrival_tolerance >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "arrival tolerance must be finite and non-negative, got {}",
                config.arrival_tolerance
            )));
        }
        if !(target.point.iter().all(|v| v.is_finite()) && target.speed.is_finite()) {
            return Err(SimError::InvalidParameter("target is not finite".into()));
        }

        let schedule = StepSchedule::new(0.0, config.max_time, config.dt)?;
        let state = vehicle.state_vector();
        if !is_finite(&state) {
            return Err(SimError::Divergence { time: 0.0 });
        }

        Ok(Self {
            vehicle,
            target,
            controller,
            detector: ArrivalDetector::new(target.point, config.arrival_tolerance),
            schedule,
            k: 0,
            current: Sample { time: schedule.time(0), state },
            finished: None,
        })
    }

    /// The sample the next step starts from.
    pub fn current(&self) -> &Sample {
        &self.current
    }

    pub fn schedule(&self) -> &StepSchedule {
        &self.schedule
    }

    /// Take one RK4 step, then check the arrival event and the time limit.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(reason) = self.finished {
            return Ok(StepOutcome { sample: self.current, terminated: Some(reason) });
        }

        let (vehicle, target, controller) = (self.vehicle, self.target, self.controller);
        let f = move |t: f64, s: &StateVector| derivatives(t, s, vehicle, &target, controller);

        let t_prev = self.current.time;
        let t_next = self.schedule.time(self.k + 1);
        let dt = t_next - t_prev;
        let next = rk4_step(&f, t_prev, &self.current.state, dt)?;

        if !is_finite(&next) {
            warn!(t = t_next, "Non-finite state, aborting run");
            return Err(SimError::Divergence { time: t_next });
        }

        let prev = self.current;
        self.k += 1;

        let terminated = if self.detector.crossed(prev.time, &prev.state, t_next, &next) {
            let (t_event, at_event) =
                locate_crossing(&f, &self.detector, prev.time, &prev.state, dt, next)?;
            self.current = Sample { time: t_event, state: at_event };
            Some(StopReason::Arrived)
        } else {
            self.current = Sample { time: t_next, state: next };
            (self.k >= self.schedule.steps()).then_some(StopReason::TimeLimit)
        };

        self.finished = terminated;
        Ok(StepOutcome { sample: self.current, terminated })
    }
}

fn is_finite(s: &StateVector) -> bool {
    s.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

/// Run from the vehicle's current state until arrival or `max_time`, using a
/// custom controller.
pub fn simulate_with(
    vehicle: &Aquadron,
    target: GuidanceTarget,
    config: &SimConfig,
    controller: &dyn Controller,
) -> Result<Trajectory> {
    let mut stepper = Stepper::new(vehicle, target, config, controller)?;

    let capacity = stepper.schedule().steps() + 1;
    let mut samples = Vec::with_capacity(capacity.min(200_000));
    samples.push(*stepper.current());

    info!(
        controller = controller.name(),
        target_y1 = target.point.x,
        target_y2 = target.point.y,
        speed = target.speed,
        dt = config.dt,
        max_time = config.max_time,
        "Simulation started"
    );

    loop {
        let outcome = stepper.step()?;
        samples.push(outcome.sample);
        if let Some(reason) = outcome.terminated {
            info!(stop_time = outcome.sample.time, ?reason, samples = samples.len(), "Simulation finished");
            return Ok(Trajectory {
                stop_time: outcome.sample.time,
                stop_reason: reason,
                samples,
            });
        }
    }
}

/// Run with the default feedback-linearizing law.
pub fn simulate(vehicle: &Aquadron, target: GuidanceTarget, config: &SimConfig) -> Result<Trajectory> {
    simulate_with(vehicle, target, config, &FeedbackLinearization::default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
