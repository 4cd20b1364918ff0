//! Numerical rank from the diagonal of a pivoted R factor

use ndarray::ArrayView1;

use crate::lstsq::LstsqError;

/// Default rank tolerance
pub const DEFAULT_TOL: f64 = 1e-10;

/// How a [`Tolerance`] is compared against the diagonal of R
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToleranceMode {
    /// `|R[i,i]| > tol * |R[0,0]|`
    #[default]
    Relative,
    /// `|R[i,i]| > tol`
    Absolute,
}

/// A validated rank tolerance: finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Create a tolerance, rejecting negative, NaN and infinite values
    ///
    /// # Examples
    /// ```
    /// use qrls::Tolerance;
    ///
    /// assert_eq!(Tolerance::new(1e-5).unwrap().value(), 1e-5);
    /// assert!(Tolerance::new(0.0).is_ok());
    /// assert!(Tolerance::new(-1.0).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, LstsqError> {
        if !value.is_finite() || value < 0.0 {
            return Err(LstsqError::InvalidTolerance(format!(
                "Tolerance must be finite and non-negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_TOL)
    }
}

/// Effective rank of a pivoted R factor
///
/// Returns the length of the longest prefix of `diag` whose entries pass the
/// tolerance test for `mode`. When `|R[0,0]|` itself fails, the rank is 0.
/// A NaN entry fails the test and ends the prefix.
pub fn estimate_rank(diag: ArrayView1<f64>, tolerance: Tolerance, mode: ToleranceMode) -> usize {
    if diag.is_empty() {
        return 0;
    }

    let cutoff = match mode {
        ToleranceMode::Relative => tolerance.value() * diag[0].abs(),
        ToleranceMode::Absolute => tolerance.value(),
    };

    let rank = diag.iter().take_while(|d| d.abs() > cutoff).count();

    log::debug!(
        target: "qrls::rank",
        "rank {} of {} ({:?} tolerance {:e}, cutoff {:e})",
        rank,
        diag.len(),
        mode,
        tolerance.value(),
        cutoff
    );

    rank
}
