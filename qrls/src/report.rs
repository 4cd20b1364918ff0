//! Fitted values and residuals of a least-squares solution

use ndarray::{s, Array2, ArrayView2};

use crate::qr::PivotedQr;

/// Fitted values `A X` and residuals `B - A X`
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub fitted: Array2<f64>,
    pub residuals: Array2<f64>,
}

impl FitReport {
    /// Recompute fits from the original `a` and `b`
    ///
    /// Shapes are validated by the caller; a mismatch here is a bug.
    pub fn compute(a: ArrayView2<f64>, b: ArrayView2<f64>, x: ArrayView2<f64>) -> Self {
        debug_assert_eq!(a.ncols(), x.nrows());
        debug_assert_eq!(a.nrows(), b.nrows());
        debug_assert_eq!(b.ncols(), x.ncols());

        let fitted = a.dot(&x);
        let residuals = &b - &fitted;
        Self { fitted, residuals }
    }

    /// Fits from the factorization alone, without the original `A`
    ///
    /// With `effects = Q^T B`, the fitted values are `Q` applied to the
    /// leading `rank` rows of the effects and the residuals `Q` applied to
    /// the remaining rows.
    pub fn from_effects(qr: &PivotedQr, effects: ArrayView2<f64>, rank: usize) -> Self {
        let rank = rank.min(effects.nrows());

        let mut fitted = effects.to_owned();
        fitted.slice_mut(s![rank.., ..]).fill(0.0);
        qr.apply_q(&mut fitted);

        let mut residuals = effects.to_owned();
        residuals.slice_mut(s![..rank, ..]).fill(0.0);
        qr.apply_q(&mut residuals);

        Self { fitted, residuals }
    }

    /// Residual sum of squares per right-hand-side column
    pub fn residual_sum_of_squares(&self) -> Vec<f64> {
        self.residuals
            .columns()
            .into_iter()
            .map(|c| c.iter().map(|v| v * v).sum())
            .collect()
    }
}
