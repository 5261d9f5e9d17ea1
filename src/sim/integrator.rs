use crate::dynamics::state::StateVector;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, fixed step
// ---------------------------------------------------------------------------

/// Single RK4 step of `ds/dt = f(t, s)` from `(t, s)` over `dt`.
pub fn rk4_step<F>(f: &F, t: f64, s: &StateVector, dt: f64) -> Result<StateVector>
where
    F: Fn(f64, &StateVector) -> Result<StateVector>,
{
    let half = dt * 0.5;
    let k1 = f(t, s)?;
    let k2 = f(t + half, &(s + k1 * half))?;
    let k3 = f(t + half, &(s + k2 * half))?;
    let k4 = f(t + dt, &(s + k3 * dt))?;

    Ok(s + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (dt / 6.0))
}

// ---------------------------------------------------------------------------
// Step grid
// ---------------------------------------------------------------------------

/// Times `t0 + k*dt` for `k = 0..=steps`, the last one pinned to `t_max`.
///
/// Times are computed from the index rather than accumulated, so long runs
/// do not drift and the final step lands exactly on `t_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSchedule {
    t0: f64,
    t_max: f64,
    dt: f64,
    steps: usize,
}

impl StepSchedule {
    pub fn new(t0: f64, t_max: f64, dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "step must be finite and positive, got {}",
                dt
            )));
        }
        if !(t0.is_finite() && t_max.is_finite() && t_max > t0) {
            return Err(SimError::InvalidParameter(format!(
                "time span [{}, {}] is empty or not finite",
                t0, t_max
            )));
        }

        let n = (t_max - t0) / dt;
        // Absorb representation error so 100 / 0.01 gives 10000 steps, not 10001.
        let steps = if (n - n.round()).abs() < 1e-9 { n.round() } else { n.ceil() };
        Ok(Self { t0, t_max, dt, steps: (steps as usize).max(1) })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time of grid point `k`.
    pub fn time(&self, k: usize) -> f64 {
        if k >= self.steps {
            self.t_max
        } else {
            self.t0 + k as f64 * self.dt
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exponential_decay_matches_closed_form() {
        let f = |_t: f64, s: &StateVector| Ok(-s);
        let mut s = StateVector::repeat(1.0);
        let dt = 0.1;
        for k in 0..10 {
            s = rk4_step(&f, k as f64 * dt, &s, dt).unwrap();
        }
        assert_relative_eq!(s[0], (-1.0_f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn time_dependent_field_uses_stage_times() {
        // ds/dt = t  =>  s(1) = 0.5, exact for RK4
        let f = |t: f64, _s: &StateVector| Ok(StateVector::repeat(t));
        let s = rk4_step(&f, 0.0, &StateVector::zeros(), 1.0).unwrap();
        assert_relative_eq!(s[3], 0.5, epsilon = 1e-14);
    }

    #[test]
    fn field_errors_propagate() {
        let f = |_t: f64, _s: &StateVector| -> Result<StateVector> {
            Err(SimError::Configuration("boom".into()))
        };
        assert!(rk4_step(&f, 0.0, &StateVector::zeros(), 0.1).is_err());
    }

    #[test]
    fn schedule_counts_steps_without_drift() {
        let s = StepSchedule::new(0.0, 100.0, 0.01).unwrap();
        assert_eq!(s.steps(), 10_000);
        assert_eq!(s.time(0), 0.0);
        assert_eq!(s.time(10_000), 100.0);
        assert_relative_eq!(s.time(5_000), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn schedule_shortens_last_step() {
        let s = StepSchedule::new(0.0, 1.05, 0.1).unwrap();
        assert_eq!(s.steps(), 11);
        assert_eq!(s.time(11), 1.05);
        assert_relative_eq!(s.time(11) - s.time(10), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn schedule_rejects_bad_parameters() {
        assert!(StepSchedule::new(0.0, 10.0, 0.0).is_err());
        assert!(StepSchedule::new(0.0, 10.0, -0.1).is_err());
        assert!(StepSchedule::new(0.0, 0.0, 0.1).is_err());
        assert!(StepSchedule::new(0.0, f64::INFINITY, 0.1).is_err());
    }
}
