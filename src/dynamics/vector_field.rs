use crate::dynamics::kinematics::{drag, rotation};
use crate::dynamics::state::{pack, pose_of, rates_of, Aquadron, StateVector, PSI};
use crate::error::Result;
use crate::gnc::{Controller, GuidanceTarget};

// ---------------------------------------------------------------------------
// Closed-loop equations of motion
// ---------------------------------------------------------------------------

/// Time derivative of `[Y1, Y2, psi, v1, v2, r]` under the given controller.
///
///   dY/dt = R(psi) * X
///   dX/dt = M^-1 * (Bu * U + Fd + Fv)
///
/// `R` and `Fd` come from `s`, never from the vehicle's stored pose/rates.
pub fn derivatives(
    _t: f64,
    s: &StateVector,
    vehicle: &Aquadron,
    target: &GuidanceTarget,
    controller: &dyn Controller,
) -> Result<StateVector> {
    let rates = rates_of(s);
    let rot = rotation(s[PSI]);
    let fd = drag(vehicle.params(), &rates);

    let u = controller.command(&pose_of(s), &rates, &fd, vehicle, target)?;

    let dpose = rot * rates;
    let drates = vehicle.m_inv() * (vehicle.bu() * u + fd + vehicle.fv);

    Ok(pack(&dpose, &drates))
}
