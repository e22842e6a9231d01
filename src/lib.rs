//! # Savitzky-Golay Smoother
//!
//! Local polynomial regression smoothing for 1-D sampled signals, in two
//! variants with different trade-offs:
//!
//! - [`GeneralSmoother`] fits a least-squares polynomial to every point's
//!   window using the real x-coordinates, so samples may be unevenly spaced.
//! - [`FastUniformSmoother`] assumes even spacing and precomputes a
//!   convolution kernel once, turning each point into a dot product.
//!
//! Both smooth a caller-owned buffer in place over an inclusive index range,
//! reading from a snapshot of the original values so the result never
//! depends on the order points are visited in.
//!
//! Diagnostics go through the [`log`] facade; the crate never installs a
//! logger itself.
//!
//! ## Example
//!
//! ```rust
//! use savgol_smoother::{FastUniformSmoother, GeneralSmoother, SmootherParams};
//!
//! let params = SmootherParams::new(2, 2, 2).expect("Invalid parameters");
//! let x: Vec<f64> = (0..7).map(|i| i as f64).collect();
//!
//! let mut general = vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
//! GeneralSmoother::new(params).unwrap().smooth(&mut general, Some(&x[..]), 0, 6).unwrap();
//!
//! let mut fast = vec![0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
//! FastUniformSmoother::new(params).smooth(&mut fast, 0, 6).unwrap();
//!
//! assert!((general[3] - fast[3]).abs() < 1e-9);
//! ```

mod coefficients;
mod error;
mod general;
mod linalg;
mod params;
mod uniform;

pub use coefficients::{compute_kernel, Kernel};
pub use error::{Result, SmoothError};
pub use general::GeneralSmoother;
pub use linalg::{horner, invert, solve, transpose};
pub use params::{validate_range, SmoothReport, SmootherParams};
pub use uniform::{FastUniformSmoother, KernelState};

/// Returns a smoothed copy of evenly spaced `data` using the fast kernel.
///
/// The first `left` and last `right` samples are copied unchanged. Empty
/// input gives an empty result.
///
/// # Example
///
/// ```rust
/// use savgol_smoother::smooth_uniform;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0];
/// let smoothed = smooth_uniform(&data, 2, 2, 2).unwrap();
/// assert_eq!(smoothed.len(), data.len());
/// ```
pub fn smooth_uniform(data: &[f64], left: isize, right: isize, degree: isize) -> Result<Vec<f64>> {
    let smoother = FastUniformSmoother::new(SmootherParams::new(left, right, degree)?);
    let mut out = data.to_vec();
    if !out.is_empty() {
        let end = out.len() as isize - 1;
        smoother.smooth(&mut out, 0, end)?;
    }
    Ok(out)
}

/// Returns a smoothed copy of `y` sampled at `x` using per-point fits.
///
/// # Arguments
///
/// * `x` - Sample positions, one per entry of `y`
/// * `y` - Sample values
/// * `left`, `right` - Samples before and after each point in its window
/// * `degree` - Degree of the local polynomial (at most `left + right`)
pub fn smooth_xy(x: &[f64], y: &[f64], left: isize, right: isize, degree: isize) -> Result<Vec<f64>> {
    let smoother = GeneralSmoother::new(SmootherParams::new(left, right, degree)?)?;
    let mut out = y.to_vec();
    if !out.is_empty() {
        let end = out.len() as isize - 1;
        smoother.smooth(&mut out, Some(x), 0, end)?;
    } else if !x.is_empty() {
        return Err(SmoothError::InvalidParameter(format!(
            "x values ({}) and y values (0) differ in length",
            x.len()
        )));
    }
    Ok(out)
}
