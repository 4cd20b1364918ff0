//! QR truncation utilities

use ndarray::{s, Array2};

use super::pivoted::PivotedQr;

/// Truncate QR factorization result to effective rank k
///
/// Given a QR factorization with effective rank k, extracts the thin
/// Q matrix (m × k) and R matrix (k × n) with `A P ≈ Q_k R_k`.
pub fn truncate_qr_result(qr: &PivotedQr, k: usize) -> (Array2<f64>, Array2<f64>) {
    let (m, n) = qr.factors.dim();
    let k = k.min(qr.taus.len());

    let mut q_trunc = Array2::<f64>::eye(m).slice_move(s![.., ..k]);
    qr.apply_q(&mut q_trunc);

    let mut r_trunc = Array2::zeros((k, n));
    for i in 0..k {
        for j in i..n {
            r_trunc[[i, j]] = qr.factors[[i, j]];
        }
    }

    (q_trunc, r_trunc)
}
