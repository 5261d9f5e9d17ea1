use nalgebra::{Matrix3, Matrix3x2, Vector3, Vector6};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Canonical state-vector layout: [pose(3), body rates(3)]
// ---------------------------------------------------------------------------

/// Integrated state: `[Y1, Y2, psi, v1, v2, r]`.
pub type StateVector = Vector6<f64>;

pub const Y1: usize = 0; // world X, m
pub const Y2: usize = 1; // world Y, m
pub const PSI: usize = 2; // heading, rad
pub const V1: usize = 3; // surge, m/s
pub const V2: usize = 4; // sway, m/s
pub const YAW_RATE: usize = 5; // r, rad/s

pub fn pack(pose: &Vector3<f64>, rates: &Vector3<f64>) -> StateVector {
    StateVector::new(pose.x, pose.y, pose.z, rates.x, rates.y, rates.z)
}

pub fn pose_of(s: &StateVector) -> Vector3<f64> {
    s.fixed_rows::<3>(Y1).into_owned()
}

pub fn rates_of(s: &StateVector) -> Vector3<f64> {
    s.fixed_rows::<3>(V1).into_owned()
}

// ---------------------------------------------------------------------------
// Physical parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    pub weight: f64, // kg
    pub j: f64,      // yaw moment of inertia, kg*m^2
    pub cx1: f64,    // surge drag coefficient
    pub cx2: f64,    // sway drag coefficient
    pub mx3: f64,    // yaw drag coefficient
}

impl VehicleParams {
    fn validate(&self) -> Result<()> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(SimError::Configuration(format!(
                "weight must be finite and positive, got {}",
                self.weight
            )));
        }
        if !(self.j.is_finite() && self.j > 0.0) {
            return Err(SimError::Configuration(format!(
                "moment of inertia must be finite and positive, got {}",
                self.j
            )));
        }
        for (name, c) in [("cx1", self.cx1), ("cx2", self.cx2), ("mx3", self.mx3)] {
            if !c.is_finite() {
                return Err(SimError::Configuration(format!(
                    "drag coefficient {} is not finite",
                    name
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vehicle: current state plus the constant model matrices
// ---------------------------------------------------------------------------

/// Planar underactuated vehicle. Surge and yaw are actuated, sway is not.
#[derive(Debug, Clone, PartialEq)]
pub struct Aquadron {
    /// Pose `[Y1, Y2, psi]`.
    pub y: Vector3<f64>,
    /// Body rates `[v1, v2, r]`.
    pub x: Vector3<f64>,
    /// Constant external disturbance force.
    pub fv: Vector3<f64>,
    params: VehicleParams,
    m_inv: Matrix3<f64>,
    bu: Matrix3x2<f64>,
}

impl Aquadron {
    pub fn new(y: Vector3<f64>, x: Vector3<f64>, params: VehicleParams) -> Result<Self> {
        params.validate()?;
        // M is diagonal, so its inverse is the elementwise reciprocal.
        let m_inv = Matrix3::from_diagonal(&Vector3::new(
            1.0 / params.weight,
            1.0 / params.weight,
            1.0 / params.j,
        ));

        Ok(Self {
            y,
            x,
            fv: Vector3::zeros(),
            params,
            m_inv,
            // Thrust drives surge, moment drives yaw.
            bu: Matrix3x2::new(
                1.0, 0.0, //
                0.0, 0.0, //
                0.0, 1.0,
            ),
        })
    }

    pub fn with_disturbance(mut self, fv: Vector3<f64>) -> Self {
        self.fv = fv;
        self
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Inverse mass/inertia matrix, fixed at construction.
    pub fn m_inv(&self) -> &Matrix3<f64> {
        &self.m_inv
    }

    /// Actuator map from `[thrust, moment]` to generalized force.
    pub fn bu(&self) -> &Matrix3x2<f64> {
        &self.bu
    }

    pub fn state_vector(&self) -> StateVector {
        pack(&self.y, &self.x)
    }

    /// Overwrite pose and rates from an integrated vector.
    pub fn set_state(&mut self, s: &StateVector) {
        self.y = pose_of(s);
        self.x = rates_of(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> VehicleParams {
        VehicleParams { weight: 10.0, j: 1.0, cx1: 1.0, cx2: 1.0, mx3: 1.0 }
    }

    #[test]
    fn mass_matrix_inverse_is_reciprocal_diagonal() {
        let cases = [
            (10.0, 1.0),
            (3.0, 7.0),
            (0.25, 1234.5),
            (50.561_234_567, 3.3),
            (1e110, 1e110),
            (1e-110, 1e-110),
        ];
        for (w, j) in cases {
            let p = VehicleParams { weight: w, j, ..params() };
            let v = Aquadron::new(Vector3::zeros(), Vector3::zeros(), p).unwrap();
            let m = v.m_inv();
            assert_eq!(m[(0, 0)], 1.0 / w);
            assert_eq!(m[(1, 1)], 1.0 / w);
            assert_eq!(m[(2, 2)], 1.0 / j);
            for (r, c) in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
                assert_eq!(m[(r, c)], 0.0);
            }
        }
    }

    #[test]
    fn non_positive_mass_is_configuration_error() {
        let p = VehicleParams { weight: 0.0, ..params() };
        let err = Aquadron::new(Vector3::zeros(), Vector3::zeros(), p).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));

        let p = VehicleParams { j: -1.0, ..params() };
        assert!(Aquadron::new(Vector3::zeros(), Vector3::zeros(), p).is_err());

        let p = VehicleParams { cx2: f64::NAN, ..params() };
        assert!(Aquadron::new(Vector3::zeros(), Vector3::zeros(), p).is_err());
    }

    #[test]
    fn state_vector_is_pose_first() {
        let v = Aquadron::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            params(),
        )
        .unwrap();
        let s = v.state_vector();
        assert_eq!(s[Y1], 1.0);
        assert_eq!(s[Y2], 2.0);
        assert_eq!(s[PSI], 3.0);
        assert_eq!(s[V1], 4.0);
        assert_eq!(s[V2], 5.0);
        assert_eq!(s[YAW_RATE], 6.0);
        assert_eq!(pose_of(&s), v.y);
        assert_eq!(rates_of(&s), v.x);
    }

    #[test]
    fn set_state_round_trips_vector() {
        let mut v = Aquadron::new(Vector3::zeros(), Vector3::zeros(), params()).unwrap();
        let s = StateVector::new(0.5, -1.0, 0.1, 0.7, 0.0, -0.2);
        v.set_state(&s);
        assert_eq!(v.state_vector(), s);
        // Model matrices are untouched by state updates.
        assert_relative_eq!(v.m_inv()[(0, 0)], 0.1, max_relative = 1e-15);
    }
}
