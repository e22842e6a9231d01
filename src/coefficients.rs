use nalgebra::DMatrix;
use crate::error::{Result, SmoothError};
use crate::linalg;
use crate::params::SmootherParams;

/// Convolution weights for uniformly spaced samples.
///
/// Row `r` holds the weights that, dotted with a window of samples, give the
/// `r`-th coefficient of the least-squares polynomial centred on the target
/// point. Column `offset + left` belongs to the sample at `offset` from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    left: usize,
    right: usize,
    coeffs: DMatrix<f64>,
}

impl Kernel {
    /// Number of samples to the left of the target point
    pub fn left(&self) -> usize {
        self.left
    }

    /// Number of samples to the right of the target point
    pub fn right(&self) -> usize {
        self.right
    }

    /// Degree of the polynomial the kernel was derived from
    pub fn degree(&self) -> usize {
        self.coeffs.nrows() - 1
    }

    /// Smoothing weights, ordered from offset `-left` to `+right`
    pub fn smoothing_weights(&self) -> Vec<f64> {
        self.coeffs.row(0).iter().copied().collect()
    }

    /// Weights producing the `order`-th polynomial coefficient, or `None`
    /// when `order` exceeds the degree.
    pub fn row(&self, order: usize) -> Option<Vec<f64>> {
        (order < self.coeffs.nrows()).then(|| self.coeffs.row(order).iter().copied().collect())
    }

    /// Weights estimating the `order`-th derivative at the target point for
    /// samples spaced `delta` apart.
    ///
    /// The `order`-th polynomial coefficient is scaled by `order!` and by
    /// `delta^-order` so the result is in physical units.
    pub fn derivative_weights(&self, order: usize, delta: f64) -> Option<Vec<f64>> {
        let factorial = (1..=order).fold(1.0, |acc, x| acc * x as f64);
        let scale = factorial / delta.powi(order as i32);
        self.row(order)
            .map(|row| row.into_iter().map(|w| w * scale).collect())
    }

    /// Dot product of the `order` row with `window`, which must hold exactly
    /// `left + right + 1` samples.
    pub(crate) fn apply_row(&self, order: usize, window: &[f64]) -> f64 {
        self.coeffs
            .row(order)
            .iter()
            .zip(window)
            .map(|(w, y)| w * y)
            .sum()
    }
}

/// Computes the Savitzky-Golay kernel for a window of `left` samples before
/// and `right` samples after the target point.
///
/// The normal matrix of the integer-offset design matrix is formed directly
/// from power sums, `AᵗA[i][j] = Σ k^(i+j)` for `k` in `-left..=right`,
/// instead of multiplying out `A`. The kernel rows are then
/// `coeff[r][k + left] = Σ_m (AᵗA)⁻¹[r][m] · k^m`.
///
/// # Arguments
///
/// * `params` - Window shape and polynomial degree
///
/// # Returns
///
/// The kernel, or `SingularMatrix` when the window has fewer than
/// `degree + 1` samples and the fit is underdetermined
pub fn compute_kernel(params: &SmootherParams) -> Result<Kernel> {
    let left = params.left();
    let right = params.right();
    let degree = params.degree();
    let terms = degree + 1;

    // Distinct offsets give full column rank exactly when there are at least
    // as many samples as polynomial terms
    if params.window_len() < terms {
        return Err(SmoothError::SingularMatrix {
            rows: terms,
            cols: terms,
        });
    }

    let offsets: Vec<f64> = (-(left as i64)..=right as i64).map(|k| k as f64).collect();

    // power_sums[p] = Σ k^p, p in 0..=2M
    let power_sums: Vec<f64> = (0..=2 * degree)
        .map(|p| offsets.iter().map(|k| k.powi(p as i32)).sum::<f64>())
        .collect();

    let ata = DMatrix::from_fn(terms, terms, |i, j| power_sums[i + j]);
    let inverse = linalg::invert(&ata)?;

    let mut coeffs = DMatrix::<f64>::zeros(terms, offsets.len());
    for row in 0..terms {
        for (col, &k) in offsets.iter().enumerate() {
            coeffs[(row, col)] = (0..terms)
                .map(|m| inverse[(row, m)] * k.powi(m as i32))
                .sum::<f64>();
        }
    }

    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(SmoothError::SingularMatrix {
            rows: terms,
            cols: terms,
        });
    }

    Ok(Kernel { left, right, coeffs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn kernel(left: isize, right: isize, degree: isize) -> Result<Kernel> {
        compute_kernel(&SmootherParams::new(left, right, degree).unwrap())
    }

    #[test]
    fn test_5_point_quadratic_smoothing() {
        let k = kernel(2, 2, 2).unwrap();
        // Known coefficients for 5-point quadratic smoothing
        let expected = [-3.0 / 35.0, 12.0 / 35.0, 17.0 / 35.0, 12.0 / 35.0, -3.0 / 35.0];

        for (actual, expected) in k.smoothing_weights().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_7_point_quadratic_smoothing() {
        let k = kernel(3, 3, 2).unwrap();
        let expected = [-2.0, 3.0, 6.0, 7.0, 6.0, 3.0, -2.0].map(|c| c / 21.0);

        for (actual, expected) in k.smoothing_weights().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_degree_zero_is_moving_average() {
        let k = kernel(1, 3, 0).unwrap();
        for w in k.smoothing_weights() {
            assert_abs_diff_eq!(w, 0.2, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        for (l, r, d) in [(2, 2, 2), (4, 1, 3), (0, 5, 2), (3, 3, 4)] {
            let sum: f64 = kernel(l, r, d).unwrap().smoothing_weights().iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_asymmetric_window_reproduces_quadratic() {
        // Weights applied to k^2 must give 0 at the target point
        let k = kernel(4, 1, 2).unwrap();
        assert_eq!((k.left(), k.right()), (4, 1));
        assert_eq!(k.smoothing_weights().len(), 6);

        let window: Vec<f64> = (-4..=1).map(|o: i32| (o * o) as f64).collect();
        assert_abs_diff_eq!(k.apply_row(0, &window), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_derivative_row() {
        let k = kernel(2, 2, 2).unwrap();
        let expected = [-2.0, -1.0, 0.0, 1.0, 2.0].map(|c| c / 10.0);
        let weights = k.derivative_weights(1, 1.0).unwrap();

        for (actual, expected) in weights.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(actual, expected, epsilon = 1e-10);
        }

        // halving the spacing doubles the slope estimate
        let scaled = k.derivative_weights(1, 0.5).unwrap();
        assert_abs_diff_eq!(scaled[4], 0.4, epsilon = 1e-10);
    }

    #[test]
    fn test_row_out_of_range() {
        let k = kernel(2, 2, 2).unwrap();
        assert_eq!(k.degree(), 2);
        assert!(k.row(2).is_some());
        assert!(k.row(3).is_none());
        assert!(k.derivative_weights(3, 1.0).is_none());
    }

    #[test]
    fn test_underdetermined_window_is_singular() {
        assert!(matches!(kernel(1, 1, 5), Err(SmoothError::SingularMatrix { .. })));
        assert!(matches!(kernel(0, 0, 1), Err(SmoothError::SingularMatrix { .. })));
    }
}
