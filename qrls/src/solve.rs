//! Rank-truncated triangular solve against a pivoted QR factorization

use ndarray::{Array2, ArrayView2};

use crate::qr::PivotedQr;

/// Coefficients and effects from a rank-truncated solve
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// `n × k` coefficients in the original column order; columns beyond
    /// the rank are exactly zero
    pub coefficients: Array2<f64>,
    /// `m × k` matrix `Q^T B`
    pub effects: Array2<f64>,
}

impl PivotedQr {
    /// Solve `min ||A X - B||` using the leading `rank` pivoted columns
    ///
    /// Can be called repeatedly with different right-hand sides without
    /// factoring again. `rank` is clamped to `min(m, n)`.
    pub fn solve(&self, b: ArrayView2<f64>, rank: usize) -> Solution {
        solve_factored(self, rank, b)
    }
}

/// Apply `Q^T` to `b`, back-substitute the leading `rank × rank` block of R
/// and scatter the result through the pivot vector
pub fn solve_factored(qr: &PivotedQr, rank: usize, b: ArrayView2<f64>) -> Solution {
    debug_assert_eq!(qr.nrows(), b.nrows());

    let n = qr.ncols();
    let k = b.ncols();
    let rank = rank.min(qr.taus.len());

    let mut effects = b.to_owned();
    qr.apply_qt(&mut effects);

    let z = back_substitute(&qr.factors, &effects, rank);

    let mut coefficients = Array2::zeros((n, k));
    for (i, &col) in qr.jpvt.iter().take(rank).enumerate() {
        coefficients.row_mut(col).assign(&z.row(i));
    }

    Solution {
        coefficients,
        effects,
    }
}

/// Solve `R[..rank, ..rank] Z = rhs[..rank, ..]` for upper triangular R
///
/// Every diagonal entry in the leading block must be non-zero, which the
/// rank estimator guarantees.
fn back_substitute(factors: &Array2<f64>, rhs: &Array2<f64>, rank: usize) -> Array2<f64> {
    let k = rhs.ncols();
    let mut z = Array2::zeros((rank, k));

    for c in 0..k {
        for i in (0..rank).rev() {
            let mut sum = rhs[[i, c]];
            for j in (i + 1)..rank {
                sum -= factors[[i, j]] * z[[j, c]];
            }
            z[[i, c]] = sum / factors[[i, i]];
        }
    }

    z
}
