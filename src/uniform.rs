use log::{debug, warn};
use crate::coefficients::{compute_kernel, Kernel};
use crate::error::{Result, SmoothError};
use crate::params::{validate_range, SmoothReport, SmootherParams};

/// Whether the current parameters produced a usable kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelState {
    /// Kernel derived from the current parameters
    Valid(Kernel),
    /// `AᵗA` for the current window could not be inverted
    Singular,
}

/// Savitzky-Golay smoother for evenly spaced samples.
///
/// The convolution kernel is computed once per parameter set, so smoothing
/// is a dot product per point with no linear solve. x-coordinates are never
/// consulted; unit spacing is assumed.
///
/// Points with fewer than `left` samples before them or `right` samples after
/// them in the buffer are passed through unchanged. This differs from
/// [`GeneralSmoother`](crate::GeneralSmoother), which extrapolates edge
/// points from a shifted window.
#[derive(Debug, Clone)]
pub struct FastUniformSmoother {
    params: SmootherParams,
    state: KernelState,
}

impl FastUniformSmoother {
    /// Creates a smoother and computes its kernel.
    ///
    /// A window too short for the requested degree is not an error here;
    /// the smoother records [`KernelState::Singular`] and refuses to smooth.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_smoother::{FastUniformSmoother, SmootherParams};
    ///
    /// let smoother = FastUniformSmoother::new(SmootherParams::new(2, 2, 2).unwrap());
    /// assert!(smoother.kernel().is_some());
    /// ```
    pub fn new(params: SmootherParams) -> Self {
        let mut smoother = Self {
            params,
            state: KernelState::Singular,
        };
        smoother.rebuild();
        smoother
    }

    /// Current window shape
    pub fn params(&self) -> &SmootherParams {
        &self.params
    }

    /// Current kernel state
    pub fn state(&self) -> &KernelState {
        &self.state
    }

    /// The kernel, if the current parameters produced one
    pub fn kernel(&self) -> Option<&Kernel> {
        match &self.state {
            KernelState::Valid(kernel) => Some(kernel),
            KernelState::Singular => None,
        }
    }

    /// Replaces the window shape and rebuilds the kernel for it
    pub fn set_params(&mut self, params: SmootherParams) {
        self.params = params;
        self.rebuild();
    }

    /// Recomputes the kernel from the current parameters
    pub fn rebuild(&mut self) {
        self.state = match compute_kernel(&self.params) {
            Ok(kernel) => {
                debug!(
                    "built {}-point kernel (left {}, right {}, degree {})",
                    self.params.window_len(),
                    self.params.left(),
                    self.params.right(),
                    self.params.degree()
                );
                KernelState::Valid(kernel)
            }
            Err(err) => {
                warn!(
                    "no kernel for left {}, right {}, degree {}: {}",
                    self.params.left(),
                    self.params.right(),
                    self.params.degree(),
                    err
                );
                KernelState::Singular
            }
        };
    }

    fn valid_kernel(&self) -> Result<&Kernel> {
        self.kernel().ok_or_else(|| {
            SmoothError::invalid(format!(
                "kernel for left {}, right {}, degree {} is singular",
                self.params.left(),
                self.params.right(),
                self.params.degree()
            ))
        })
    }

    /// Smooths `y_values[start..=end]` in place.
    ///
    /// Reads come from a copy of `y_values` taken before the first write.
    /// Points without a full window inside the buffer keep their value and
    /// are counted as skipped.
    ///
    /// Neighbours are counted across the whole buffer, not just the range:
    /// a point inside `start..=end` is smoothed from real samples outside
    /// the range whenever they exist. Only the buffer's first `left` and
    /// last `right` samples pass through.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the range fails [`validate_range`] or the kernel
    /// is singular. Nothing is modified in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_smoother::{FastUniformSmoother, SmootherParams};
    ///
    /// let mut y = [0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
    /// let smoother = FastUniformSmoother::new(SmootherParams::new(2, 2, 2).unwrap());
    /// smoother.smooth(&mut y, 0, 6).unwrap();
    /// assert!((y[3] - 170.0 / 35.0).abs() < 1e-9);
    /// assert_eq!(y[0], 0.0);
    /// ```
    pub fn smooth(&self, y_values: &mut [f64], start: isize, end: isize) -> Result<SmoothReport> {
        let (start, end) = validate_range(Some(&*y_values), start, end)?;
        let kernel = self.valid_kernel()?;

        let n = y_values.len();
        let left = self.params.left();
        let right = self.params.right();
        let snapshot = y_values.to_vec();
        let mut report = SmoothReport::default();

        for i in start..=end {
            if i < left || i + right >= n {
                report.skipped += 1;
                continue;
            }
            y_values[i] = kernel.apply_row(0, &snapshot[i - left..=i + right]);
            report.smoothed += 1;
        }

        Ok(report)
    }

    /// Estimates the `order`-th derivative at every sample, for samples
    /// spaced `delta` apart.
    ///
    /// Entries are `None` where the sample lacks a full window, matching the
    /// edge policy of [`smooth`](Self::smooth).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `order` exceeds the degree, `delta` is not a
    /// positive finite number, or the kernel is singular.
    pub fn differentiate(&self, y_values: &[f64], order: usize, delta: f64) -> Result<Vec<Option<f64>>> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(SmoothError::invalid(format!(
                "sample spacing must be positive and finite, got {}",
                delta
            )));
        }
        let kernel = self.valid_kernel()?;
        let weights = kernel.derivative_weights(order, delta).ok_or_else(|| {
            SmoothError::invalid(format!(
                "derivative order {} exceeds polynomial degree {}",
                order,
                kernel.degree()
            ))
        })?;

        let n = y_values.len();
        let left = self.params.left();
        let right = self.params.right();

        Ok((0..n)
            .map(|i| {
                if i < left || i + right >= n {
                    return None;
                }
                Some(
                    weights
                        .iter()
                        .zip(&y_values[i - left..=i + right])
                        .map(|(w, y)| w * y)
                        .sum::<f64>(),
                )
            })
            .collect())
    }
}
