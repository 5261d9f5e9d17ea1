use nalgebra::{Matrix2x3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::Aquadron;
use crate::error::Result;
use crate::linalg;
use super::guidance::{desired_heading, BearingMode, GuidanceTarget};

// ---------------------------------------------------------------------------
// Feedback-linearizing heading/speed regulator
// ---------------------------------------------------------------------------

/// Error-dynamics coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlGains {
    pub t1: f64, // heading proportional
    pub t2: f64, // heading rate
    pub t3: f64, // surge speed proportional
}

impl Default for ControlGains {
    fn default() -> Self {
        Self { t1: 25.0, t2: 10.0, t3: 5.0 }
    }
}

/// Selects the regulated channels `[yaw rate, surge]` out of the 3 body rates.
fn channel_selector() -> Matrix2x3<f64> {
    Matrix2x3::new(
        0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0,
    )
}

/// Inverts the actuated part of the dynamics so that the closed loop obeys
///
///   d(r)/dt  = -(T2 * r + T1 * (psi - psi_d))
///   d(v1)/dt = -T3 * (v1 - v_target)
///
/// Sway has no actuator and settles through drag alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedbackLinearization {
    pub gains: ControlGains,
    pub bearing: BearingMode,
}

impl FeedbackLinearization {
    pub fn new(gains: ControlGains, bearing: BearingMode) -> Self {
        Self { gains, bearing }
    }

    /// Weighted tracking errors `[T2*r + T1*(psi - psi_d), T3*(v1 - v_target)]`.
    pub fn tracking_errors(
        &self,
        pose: &Vector3<f64>,
        rates: &Vector3<f64>,
        target: &GuidanceTarget,
    ) -> Vector2<f64> {
        let psi_d = desired_heading(pose, &target.point, self.bearing);
        let e_heading = pose.z - psi_d;
        let e_heading_dot = rates.z;
        let e_speed = rates.x - target.speed;

        Vector2::new(
            self.gains.t2 * e_heading_dot + self.gains.t1 * e_heading,
            self.gains.t3 * e_speed,
        )
    }
}

impl super::Controller for FeedbackLinearization {
    fn command(
        &self,
        pose: &Vector3<f64>,
        rates: &Vector3<f64>,
        drag: &Vector3<f64>,
        vehicle: &Aquadron,
        target: &GuidanceTarget,
    ) -> Result<Vector2<f64>> {
        let a = channel_selector();
        let am = a * vehicle.m_inv();
        let gain = linalg::invert2(&(am * vehicle.bu()))?;
        let e = self.tracking_errors(pose, rates, target);

        Ok(-(gain * (am * (drag + vehicle.fv) + e)))
    }

    fn name(&self) -> &str {
        "FeedbackLinearization"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::kinematics::drag;
    use crate::dynamics::state::VehicleParams;
    use crate::gnc::Controller;
    use approx::assert_relative_eq;

    fn vehicle(y: Vector3<f64>, x: Vector3<f64>) -> Aquadron {
        let p = VehicleParams { weight: 10.0, j: 2.0, cx1: 1.0, cx2: 1.0, mx3: 0.5 };
        Aquadron::new(y, x, p).unwrap()
    }

    fn command(v: &Aquadron, target: &GuidanceTarget) -> Vector2<f64> {
        let fd = drag(v.params(), &v.x);
        FeedbackLinearization::default().command(&v.y, &v.x, &fd, v, target).unwrap()
    }

    #[test]
    fn zero_error_gives_zero_command() {
        let v = vehicle(Vector3::new(5.0, -2.0, 0.3), Vector3::zeros());
        let target = GuidanceTarget::new(Vector2::new(5.0, -2.0), 0.0);
        let u = command(&v, &target);
        assert_relative_eq!(u, Vector2::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn thrust_cancels_drag_at_target_speed() {
        // Heading already on the bearing, cruising at the commanded speed.
        let v = vehicle(Vector3::zeros(), Vector3::new(0.7, 0.0, 0.0));
        let target = GuidanceTarget::new(Vector2::new(10.0, 0.0), 0.7);
        let u = command(&v, &target);
        assert_relative_eq!(u.x, 1.0 * 0.7, epsilon = 1e-12);
        assert_relative_eq!(u.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn closed_loop_channels_follow_error_dynamics() {
        let v = vehicle(Vector3::new(1.0, 2.0, 0.4), Vector3::new(0.3, -0.1, 0.2));
        let target = GuidanceTarget::new(Vector2::new(8.0, -3.0), 1.2);
        let law = FeedbackLinearization::default();
        let fd = drag(v.params(), &v.x);
        let u = law.command(&v.y, &v.x, &fd, &v, &target).unwrap();

        let accel = v.m_inv() * (v.bu() * u + fd + v.fv);
        let e = law.tracking_errors(&v.y, &v.x, &target);
        assert_relative_eq!(accel.z, -e.x, epsilon = 1e-12);
        assert_relative_eq!(accel.x, -e.y, epsilon = 1e-12);
    }

    #[test]
    fn disturbance_is_cancelled_on_actuated_channels() {
        let v = vehicle(Vector3::zeros(), Vector3::new(0.7, 0.0, 0.0))
            .with_disturbance(Vector3::new(2.0, 0.5, -1.0));
        let target = GuidanceTarget::new(Vector2::new(10.0, 0.0), 0.7);
        let fd = drag(v.params(), &v.x);
        let u = FeedbackLinearization::default().command(&v.y, &v.x, &fd, &v, &target).unwrap();
        let accel = v.m_inv() * (v.bu() * u + fd + v.fv);
        assert_relative_eq!(accel.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(accel.z, 0.0, epsilon = 1e-12);
        // Sway is unactuated and feels the disturbance.
        assert_relative_eq!(accel.y, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn very_heavy_vehicle_still_gets_a_command() {
        let p = VehicleParams { weight: 1e151, j: 1e151, cx1: 1.0, cx2: 1.0, mx3: 0.5 };
        let v = Aquadron::new(Vector3::zeros(), Vector3::new(0.7, 0.0, 0.0), p).unwrap();
        let target = GuidanceTarget::new(Vector2::new(10.0, 0.0), 0.7);
        let u = command(&v, &target);
        assert_relative_eq!(u.x, 0.7, max_relative = 1e-12);
        assert_relative_eq!(u.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tracking_errors_weighting() {
        let law = FeedbackLinearization::default();
        let target = GuidanceTarget::new(Vector2::new(10.0, 0.0), 1.0);
        let e = law.tracking_errors(&Vector3::new(0.0, 0.0, 0.1), &Vector3::new(0.5, 0.0, 0.2), &target);
        assert_relative_eq!(e.x, 10.0 * 0.2 + 25.0 * 0.1, epsilon = 1e-12);
        assert_relative_eq!(e.y, 5.0 * (0.5 - 1.0), epsilon = 1e-12);
    }
}
