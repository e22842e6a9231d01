use crate::error::{Result, SmoothError};

/// Window shape shared by both smoothers: points to the left, points to the
/// right, and the degree of the fitted polynomial.
///
/// Values arrive as signed integers because that is what callers hold; a
/// negative count is rejected instead of being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmootherParams {
    left: usize,
    right: usize,
    degree: usize,
}

impl SmootherParams {
    /// Creates a validated parameter set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use savgol_smoother::SmootherParams;
    ///
    /// let params = SmootherParams::new(2, 2, 2).expect("valid parameters");
    /// assert_eq!(params.window_len(), 5);
    /// assert!(SmootherParams::new(-1, 2, 1).is_err());
    /// ```
    pub fn new(left: isize, right: isize, degree: isize) -> Result<Self> {
        Ok(Self {
            left: non_negative("left window size", left)?,
            right: non_negative("right window size", right)?,
            degree: non_negative("polynomial degree", degree)?,
        })
    }

    /// Number of samples to the left of the target point
    pub fn left(&self) -> usize {
        self.left
    }

    /// Number of samples to the right of the target point
    pub fn right(&self) -> usize {
        self.right
    }

    /// Degree of the local polynomial
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Total number of samples in one window
    pub fn window_len(&self) -> usize {
        self.left + self.right + 1
    }

    /// Returns a copy with a new left window size
    pub fn with_left(self, left: isize) -> Result<Self> {
        Ok(Self {
            left: non_negative("left window size", left)?,
            ..self
        })
    }

    /// Returns a copy with a new right window size
    pub fn with_right(self, right: isize) -> Result<Self> {
        Ok(Self {
            right: non_negative("right window size", right)?,
            ..self
        })
    }

    /// Returns a copy with a new polynomial degree
    pub fn with_degree(self, degree: isize) -> Result<Self> {
        Ok(Self {
            degree: non_negative("polynomial degree", degree)?,
            ..self
        })
    }

    /// Checks that the window spans at least `degree` steps, which the
    /// per-point least-squares fit needs to have a unique solution.
    pub fn ensure_span_covers_degree(&self) -> Result<()> {
        if self.left + self.right < self.degree {
            return Err(SmoothError::invalid(format!(
                "window span {} (left {} + right {}) is smaller than polynomial degree {}",
                self.left + self.right,
                self.left,
                self.right,
                self.degree
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: isize) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| SmoothError::invalid(format!("{} must be non-negative, got {}", name, value)))
}

/// Checks an inclusive index range against a sample buffer.
///
/// Fails if the buffer is missing, if either index is negative or past the
/// end of the buffer, or if `end < start`. On success the bounds come back as
/// `usize` so callers can index without further checks.
///
/// # Example
///
/// ```rust
/// use savgol_smoother::validate_range;
///
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(validate_range(Some(&data[..]), 1, 3).unwrap(), (1, 3));
/// assert!(validate_range(Some(&data[..]), -1, 3).is_err());
/// assert!(validate_range(None, 0, 0).is_err());
/// ```
pub fn validate_range(buffer: Option<&[f64]>, start: isize, end: isize) -> Result<(usize, usize)> {
    let buffer = buffer.ok_or_else(|| SmoothError::invalid("sample buffer is missing"))?;

    if start < 0 || end < 0 {
        return Err(SmoothError::invalid(format!(
            "indices must be non-negative, got start {} and end {}",
            start, end
        )));
    }
    if end < start {
        return Err(SmoothError::invalid(format!(
            "end index {} is before start index {}",
            end, start
        )));
    }

    let (start, end) = (start as usize, end as usize);
    if end >= buffer.len() {
        return Err(SmoothError::invalid(format!(
            "index range {}..={} exceeds buffer of length {}",
            start,
            end,
            buffer.len()
        )));
    }

    Ok((start, end))
}

/// Outcome of one smoothing pass over an index range.
///
/// Points are skipped when no usable fit exists for them (singular local
/// system, a window longer than the buffer, or not enough neighbours for the
/// uniform kernel); skipped points keep their original value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothReport {
    /// Points overwritten with a smoothed value
    pub smoothed: usize,
    /// Points left unchanged
    pub skipped: usize,
}
