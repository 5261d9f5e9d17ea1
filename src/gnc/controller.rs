use nalgebra::{Vector2, Vector3};

use crate::dynamics::state::Aquadron;
use crate::error::Result;
use super::guidance::GuidanceTarget;

/// Trait for actuator command laws.
///
/// Implementations must be pure: the integrator evaluates them at every
/// Runge-Kutta stage, not once per step.
pub trait Controller {
    /// Compute `[thrust, yaw moment]` for the given pose, body rates and the
    /// drag force already evaluated at those rates.
    fn command(
        &self,
        pose: &Vector3<f64>,
        rates: &Vector3<f64>,
        drag: &Vector3<f64>,
        vehicle: &Aquadron,
        target: &GuidanceTarget,
    ) -> Result<Vector2<f64>>;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
