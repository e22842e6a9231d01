use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use crate::error::{Result, SmoothError};
use crate::linalg;
use crate::params::{validate_range, SmoothReport, SmootherParams};

/// Savitzky-Golay smoother for samples at arbitrary x positions.
///
/// Every output point gets its own least-squares polynomial fit over the
/// actual x-coordinates of its window, so the samples do not need to be
/// evenly spaced. This costs one small linear solve per point; for evenly
/// spaced data [`FastUniformSmoother`](crate::FastUniformSmoother) computes
/// the same interior values from a precomputed kernel.
///
/// Near the ends of the buffer the window is shifted inwards so that it
/// always holds `left + right + 1` samples, and the fit is evaluated
/// (extrapolated) at the edge point's own x. The uniform smoother instead
/// passes edge points through unchanged; the two edge policies differ on
/// purpose and callers rely on each.
#[derive(Debug, Clone)]
pub struct GeneralSmoother {
    params: SmootherParams,
}

impl GeneralSmoother {
    /// Creates a smoother, rejecting windows that span fewer steps than the
    /// polynomial degree.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_smoother::{GeneralSmoother, SmootherParams};
    ///
    /// let smoother = GeneralSmoother::new(SmootherParams::new(2, 2, 2).unwrap()).unwrap();
    /// assert_eq!(smoother.params().degree(), 2);
    /// assert!(GeneralSmoother::new(SmootherParams::new(1, 1, 5).unwrap()).is_err());
    /// ```
    pub fn new(params: SmootherParams) -> Result<Self> {
        params.ensure_span_covers_degree()?;
        Ok(Self { params })
    }

    /// Current window shape
    pub fn params(&self) -> &SmootherParams {
        &self.params
    }

    /// Replaces the window shape after validating it
    pub fn set_params(&mut self, params: SmootherParams) -> Result<()> {
        params.ensure_span_covers_degree()?;
        self.params = params;
        Ok(())
    }

    /// Smooths `y_values[start..=end]` in place.
    ///
    /// All fits read from a copy of `y_values` taken before the first write,
    /// so the result does not depend on the order points are visited in.
    /// Points whose local system is singular, or whose fit evaluates to NaN,
    /// keep their original value and are counted as skipped.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `x_values` is missing or its length differs from
    /// `y_values`, or if the range fails [`validate_range`]. Nothing is
    /// modified in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_smoother::{GeneralSmoother, SmootherParams};
    ///
    /// let x = [0.0, 0.5, 1.5, 2.0, 3.5, 4.0, 5.0];
    /// let mut y = [0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
    /// let smoother = GeneralSmoother::new(SmootherParams::new(2, 2, 2).unwrap()).unwrap();
    /// let report = smoother.smooth(&mut y, Some(&x[..]), 0, 6).unwrap();
    /// assert_eq!(report.smoothed, 7);
    /// assert!(y[3] > 0.0 && y[3] < 10.0);
    /// ```
    pub fn smooth(
        &self,
        y_values: &mut [f64],
        x_values: Option<&[f64]>,
        start: isize,
        end: isize,
    ) -> Result<SmoothReport> {
        let x_values = x_values.ok_or_else(|| SmoothError::invalid("x values are missing"))?;
        if x_values.len() != y_values.len() {
            return Err(SmoothError::invalid(format!(
                "x values ({}) and y values ({}) differ in length",
                x_values.len(),
                y_values.len()
            )));
        }
        let (start, end) = validate_range(Some(&*y_values), start, end)?;

        let n = y_values.len();
        let left = self.params.left();
        let right = self.params.right();
        let window = self.params.window_len();
        let mut report = SmoothReport::default();

        if n < window {
            debug!(
                "buffer of {} samples is shorter than the {}-sample window, leaving {}..={} unchanged",
                n, window, start, end
            );
            report.skipped = end - start + 1;
            return Ok(report);
        }

        let snapshot = y_values.to_vec();
        let terms = self.params.degree() + 1;

        for i in start..=end {
            let center = i.clamp(left, n - 1 - right);
            let lo = center - left;
            // Powers are taken of (x - x[centre]) / span, which keeps every
            // column of A within [-1, 1]; the fitted polynomial is the same
            let origin = x_values[center];
            let span = x_values[lo..lo + window]
                .iter()
                .map(|x| (x - origin).abs())
                .fold(0.0, f64::max);
            let span = if span > 0.0 { span } else { 1.0 };

            let design = DMatrix::from_fn(window, terms, |r, c| {
                ((x_values[lo + r] - origin) / span).powi(c as i32)
            });
            let target = DVector::from_column_slice(&snapshot[lo..lo + window]);

            match linalg::solve(&design, &target) {
                Ok(coeffs) => {
                    let value = linalg::horner(coeffs.as_slice(), (x_values[i] - origin) / span);
                    if value.is_nan() {
                        trace!("fit at index {} evaluated to NaN, keeping original value", i);
                        report.skipped += 1;
                    } else {
                        y_values[i] = value;
                        report.smoothed += 1;
                    }
                }
                Err(err) => {
                    trace!("no fit at index {}: {}", i, err);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }
}
