use nalgebra::{DMatrix, DVector};
use crate::error::{Result, SmoothError};

/// Solves the (possibly overdetermined) system `A x ≈ b` in the least squares
/// sense through the normal equations `AᵗA x = Aᵗb`.
///
/// Each row of `a` holds the basis functions evaluated at one sample, so `a`
/// is `samples × coefficients` and `b` has one entry per sample.
///
/// # Errors
///
/// * `InvalidParameter` if `b` does not have one entry per row of `a`
/// * `SingularMatrix` if `AᵗA` is numerically rank deficient (an LU pivot at
///   or below `n·ε` times the largest pivot) or the solution is not finite
///
/// The pivot test is relative, so columns of `a` should be of comparable
/// scale; [`GeneralSmoother`](crate::GeneralSmoother) normalises its
/// coordinates to `[-1, 1]` before calling this.
pub fn solve(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != b.len() {
        return Err(SmoothError::invalid(format!(
            "design matrix has {} rows but target vector has {} entries",
            a.nrows(),
            b.len()
        )));
    }

    let at = transpose(a);
    let ata = &at * a;
    let atb = &at * b;
    let singular = SmoothError::SingularMatrix {
        rows: ata.nrows(),
        cols: ata.ncols(),
    };

    // LU only refuses exact zero pivots; a rank-deficient AᵗA usually leaves a
    // rounding-sized pivot instead, so compare against the largest one
    let lu = ata.lu();
    let pivots = lu.u().diagonal().map(f64::abs);
    let largest = pivots.max();
    let tolerance = pivots.len() as f64 * f64::EPSILON * largest;
    if !(largest > 0.0) || pivots.iter().any(|&p| p <= tolerance) {
        return Err(singular);
    }

    let coeffs = lu.solve(&atb).ok_or_else(|| singular.clone())?;
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(singular);
    }

    Ok(coeffs)
}

/// Dense transpose
pub fn transpose(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    matrix.transpose()
}

/// Inverts a square matrix.
///
/// # Errors
///
/// * `InvalidParameter` if the matrix is not square
/// * `SingularMatrix` if it has no inverse
pub fn invert(matrix: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !matrix.is_square() {
        return Err(SmoothError::invalid(format!(
            "cannot invert a non-square {}x{} matrix",
            matrix.nrows(),
            matrix.ncols()
        )));
    }

    let singular = SmoothError::SingularMatrix {
        rows: matrix.nrows(),
        cols: matrix.ncols(),
    };
    let inverse = matrix.clone().try_inverse().ok_or_else(|| singular.clone())?;
    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(singular);
    }
    Ok(inverse)
}

/// Evaluates `c[0] + c[1] x + ... + c[M] x^M` by Horner's rule.
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve_exact_line() {
        // y = 2 + 3x sampled at x = 0, 1, 2, 3
        let a = DMatrix::from_fn(4, 2, |i, j| (i as f64).powi(j as i32));
        let b = DVector::from_iterator(4, (0..4).map(|i| 2.0 + 3.0 * i as f64));
        let coeffs = solve(&a, &b).unwrap();

        assert_abs_diff_eq!(coeffs[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(coeffs[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_overdetermined_fit() {
        // Best constant through 1, 2, 3, 6 is their mean
        let a = DMatrix::from_element(4, 1, 1.0);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 6.0]);
        let coeffs = solve(&a, &b).unwrap();

        assert_abs_diff_eq!(coeffs[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_singular() {
        // Every sample at the same x cannot pin down a slope
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![1.0, 1.0, 1.0]);

        assert!(matches!(solve(&a, &b), Err(SmoothError::SingularMatrix { .. })));
    }

    #[test]
    fn test_solve_rounded_duplicate_rows() {
        // Two samples at offset 0 and one at 0.3 - 0.1: only two distinct
        // points for a quadratic, but d is not exactly representable
        let d = 0.3 - 0.1;
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, d, d * d]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        assert!(matches!(solve(&a, &b), Err(SmoothError::SingularMatrix { rows: 3, cols: 3 })));
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let a = DMatrix::from_element(3, 1, 1.0);
        let b = DVector::from_vec(vec![1.0, 2.0]);

        assert!(matches!(solve(&a, &b), Err(SmoothError::InvalidParameter(_))));
    }

    #[test]
    fn test_transpose() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = transpose(&m);

        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t[(2, 0)], 3.0);
        assert_eq!(t[(0, 1)], 4.0);
    }

    #[test]
    fn test_invert() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = invert(&m).unwrap();
        let identity = &m * &inv;

        assert_abs_diff_eq!(identity[(0, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(identity[(0, 1)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(identity[(1, 0)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(identity[(1, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_singular_and_non_square() {
        let singular = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(invert(&singular), Err(SmoothError::SingularMatrix { rows: 2, cols: 2 })));

        let rect = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(invert(&rect), Err(SmoothError::InvalidParameter(_))));
    }

    #[test]
    fn test_horner() {
        // 1 - 2x + 3x^2 at x = 2
        assert_abs_diff_eq!(horner(&[1.0, -2.0, 3.0], 2.0), 9.0, epsilon = 1e-12);
        assert_eq!(horner(&[], 5.0), 0.0);
        assert_eq!(horner(&[4.0], 100.0), 4.0);
    }
}
