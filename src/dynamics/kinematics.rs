use nalgebra::{Matrix3, Vector3};

use crate::dynamics::state::VehicleParams;

// ---------------------------------------------------------------------------
// Rotation and drag, recomputed from the current state on every evaluation
// ---------------------------------------------------------------------------

/// Maps body rates `[v1, v2, r]` to pose rates `[dY1, dY2, dpsi]`.
pub fn rotation(psi: f64) -> Matrix3<f64> {
    let (s, c) = psi.sin_cos();
    Matrix3::new(
        c, s, 0.0, //
        -s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Nonlinear drag and coupling force for body rates `[v1, v2, r]`.
pub fn drag(params: &VehicleParams, rates: &Vector3<f64>) -> Vector3<f64> {
    let (v1, v2, r) = (rates.x, rates.y, rates.z);
    Vector3::new(
        -params.weight * v2 * r - params.cx1 * v1,
        -params.weight * v1 * r - params.cx2 * v2,
        -params.mx3 * r,
    )
}
