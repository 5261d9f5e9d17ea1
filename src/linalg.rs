use nalgebra::Matrix2;

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Closed-form inverse for the 2x2 control matrix
// ---------------------------------------------------------------------------

/// Inverse of a 2x2 matrix via its adjugate.
pub fn invert2(m: &Matrix2<f64>) -> Result<Matrix2<f64>> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    check_det(det, "2x2")?;
    let adj = Matrix2::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)]);
    Ok(adj / det)
}

/// Singular means an exactly zero or non-finite determinant. The control
/// matrix scales as `1 / (weight * J)`, so tiny magnitudes are valid.
fn check_det(det: f64, shape: &str) -> Result<()> {
    if !det.is_finite() || det == 0.0 {
        return Err(SimError::Configuration(format!(
            "{} matrix is singular (det = {:e})",
            shape, det
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_2x2_times_original_is_identity() {
        let m = Matrix2::new(0.0, 0.5, 0.1, 0.0);
        let inv = invert2(&m).unwrap();
        assert_relative_eq!(inv * m, Matrix2::identity(), epsilon = 1e-12);
        assert_relative_eq!(inv[(0, 1)], 10.0, epsilon = 1e-12);
        assert_relative_eq!(inv[(1, 0)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn tiny_determinant_is_still_invertible() {
        // Shape of A·M·Bu for weight = J = 1e151.
        let m = Matrix2::new(0.0, 1e-151, 1e-151, 0.0);
        let inv = invert2(&m).unwrap();
        assert_relative_eq!(inv[(0, 1)], 1e151, max_relative = 1e-12);
        assert_relative_eq!(inv[(1, 0)], 1e151, max_relative = 1e-12);
    }

    #[test]
    fn singular_matrices_are_rejected() {
        let m2 = Matrix2::new(1.0, 2.0, 2.0, 4.0);
        assert!(matches!(invert2(&m2), Err(SimError::Configuration(_))));
        assert!(invert2(&Matrix2::zeros()).is_err());
    }

    #[test]
    fn nan_entries_are_rejected() {
        let m = Matrix2::new(f64::NAN, 0.0, 0.0, 1.0);
        assert!(invert2(&m).is_err());
    }
}
