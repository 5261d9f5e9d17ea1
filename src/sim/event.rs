use nalgebra::Vector2;
use tracing::debug;

use crate::dynamics::state::{StateVector, Y1, Y2};
use crate::error::Result;
use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Termination events
// ---------------------------------------------------------------------------

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Entered the arrival disk around the target.
    Arrived,
    /// Reached `max_time` without an event.
    TimeLimit,
}

/// Switching function monitored after every accepted step.
///
/// The event fires when `g` goes from positive to non-positive.
pub trait EventDetector {
    fn g(&self, t: f64, s: &StateVector) -> f64;

    fn crossed(&self, t_prev: f64, prev: &StateVector, t: f64, current: &StateVector) -> bool {
        self.g(t_prev, prev) > 0.0 && self.g(t, current) <= 0.0
    }
}

/// Fires when the vehicle enters a disk of radius `sqrt(tolerance)` around
/// the target point.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalDetector {
    pub target: Vector2<f64>,
    pub tolerance: f64,
}

impl ArrivalDetector {
    pub fn new(target: Vector2<f64>, tolerance: f64) -> Self {
        Self { target, tolerance }
    }
}

impl EventDetector for ArrivalDetector {
    fn g(&self, _t: f64, s: &StateVector) -> f64 {
        (s[Y1] - self.target.x).powi(2) + (s[Y2] - self.target.y).powi(2) - self.tolerance
    }
}

// ---------------------------------------------------------------------------
// Crossing localization
// ---------------------------------------------------------------------------

/// Time resolution of the localized event.
pub const EVENT_TIME_TOL: f64 = 1e-8;
const MAX_BISECTIONS: usize = 100;

/// Locate a crossing inside the step `[t_prev, t_prev + dt]` by bisecting the
/// length of a single RK4 step taken from `prev`.
///
/// `prev` must have `g > 0` and the full step `g <= 0`. Returns the event time
/// and the state there; the returned state always satisfies `g <= 0`.
pub fn locate_crossing<F, D>(
    f: &F,
    detector: &D,
    t_prev: f64,
    prev: &StateVector,
    dt: f64,
    full: StateVector,
) -> Result<(f64, StateVector)>
where
    F: Fn(f64, &StateVector) -> Result<StateVector>,
    D: EventDetector + ?Sized,
{
    let mut lo = 0.0;
    let mut hi = dt;
    let mut at_hi = full;
    let mut iterations = 0;

    while hi - lo > EVENT_TIME_TOL && iterations < MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        let s = rk4_step(f, t_prev, prev, mid)?;
        if detector.g(t_prev + mid, &s) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
            at_hi = s;
        }
        iterations += 1;
    }

    debug!(t = t_prev + hi, iterations, "Event localized");
    Ok((t_prev + hi, at_hi))
}
