//! Result validation utilities

use ndarray::{s, Array2, ArrayView2};

use crate::qr::PivotedQr;
use crate::utils::norms::norm_frobenius;
use crate::utils::pivoting::apply_column_permutation;

/// Validate a pivoted QR factorization
///
/// Checks that `A P = Q R` within `tolerance` relative to `||A||_F` and that
/// Q is orthogonal.
pub fn validate_qr(original: ArrayView2<f64>, qr: &PivotedQr, tolerance: f64) -> bool {
    if original.dim() != qr.factors.dim() || qr.jpvt.len() != original.ncols() {
        return false;
    }

    let q = qr.q();
    if !is_orthogonal(q.view(), tolerance) {
        return false;
    }

    is_reconstruction_valid(original, &q, &qr.r(), &qr.jpvt, tolerance)
}

/// Check if the columns of a matrix are orthonormal
fn is_orthogonal(matrix: ArrayView2<f64>, tolerance: f64) -> bool {
    let qtq = matrix.t().dot(&matrix);
    let k = qtq.nrows();
    for i in 0..k {
        for j in 0..k {
            let expected = if i == j { 1.0 } else { 0.0 };
            if (qtq[[i, j]] - expected).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Check that ||A P - Q R||_F < tolerance * ||A||_F
fn is_reconstruction_valid(
    original: ArrayView2<f64>,
    q: &Array2<f64>,
    r: &Array2<f64>,
    jpvt: &[usize],
    tolerance: f64,
) -> bool {
    let mut ap = original.to_owned();
    apply_column_permutation(&mut ap, jpvt);

    let k = r.nrows();
    let diff = &ap - &q.slice(s![.., ..k]).dot(r);

    let diff_norm = norm_frobenius(diff.view());
    let orig_norm = norm_frobenius(original);

    if orig_norm == 0.0 {
        diff_norm < tolerance
    } else {
        diff_norm < tolerance * orig_norm
    }
}
