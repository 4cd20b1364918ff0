//! Householder reflection utilities for QR decomposition

use ndarray::{s, Array1, Array2, ArrayView1, ArrayViewMut1, ArrayViewMut2};

use crate::utils::norms::norm_2;

/// Compute Householder reflection vector and coefficient
///
/// Given a vector x, computes a Householder reflection H = I - τvv^T
/// such that Hx = [β, 0, ..., 0]^T where β = -sign(x0)·||x||.
///
/// On return `x[0]` holds β and `x[1..]` holds the tail of `v` (the leading
/// entry of `v` is an implicit 1). Returns (τ, β).
///
/// A vector whose norm is not above `threshold` is treated as numerically
/// zero: the reflection is the identity (τ = 0) and `x` is cleared, so the
/// caller records β = 0 on the diagonal.
pub fn reflector(mut x: ArrayViewMut1<f64>, threshold: f64) -> (f64, f64) {
    let n = x.len();
    if n == 0 {
        return (0.0, 0.0);
    }

    let x0 = x[0];
    let norm_x = norm_2(x.view());

    if !(norm_x > threshold) && !norm_x.is_nan() {
        x.fill(0.0);
        return (0.0, 0.0);
    }

    // ν = sign(x0) * ||x||
    let nu = if x0 >= 0.0 { norm_x } else { -norm_x };
    let x0_new = x0 + nu;
    x[0] = -nu;

    if x0_new != 0.0 {
        for i in 1..n {
            x[i] /= x0_new;
        }
    }

    let tau = if nu != 0.0 { x0_new / nu } else { 0.0 };

    (tau, -nu)
}

/// Apply Householder reflection to a matrix
///
/// Applies H = I - τvv^T to `a` from the left. Only `v[1..]` is read; the
/// leading entry of `v` is taken to be 1, which lets callers pass the packed
/// column of a factorization directly (its first slot holds β).
pub fn reflector_apply(v: ArrayView1<f64>, tau: f64, mut a: ArrayViewMut2<f64>) {
    let m = a.nrows();
    let n = a.ncols();

    if m == 0 || n == 0 || tau == 0.0 {
        return;
    }

    for j in 0..n {
        // vaj = tau * (A(0, j) + v[1..] . A[1.., j])
        let mut vaj = a[[0, j]];
        for i in 1..m {
            vaj += v[i] * a[[i, j]];
        }
        vaj *= tau;

        a[[0, j]] -= vaj;
        for i in 1..m {
            a[[i, j]] -= vaj * v[i];
        }
    }
}

/// Apply Q^T to a block in place
///
/// `factors`/`taus` are the packed output of a QR factorization of an
/// `m × n` matrix; `b` must have `m` rows. Reflectors are applied in forward
/// order since Q^T = H_{k-1} ... H_1 H_0.
pub fn apply_qt(factors: &Array2<f64>, taus: &Array1<f64>, b: &mut Array2<f64>) {
    debug_assert_eq!(factors.nrows(), b.nrows());
    for i in 0..taus.len() {
        if taus[i] != 0.0 {
            let v = factors.slice(s![i.., i]);
            reflector_apply(v, taus[i], b.slice_mut(s![i.., ..]));
        }
    }
}

/// Apply Q to a block in place
///
/// Inverse of [`apply_qt`]: reflectors are applied in reverse order.
pub fn apply_q(factors: &Array2<f64>, taus: &Array1<f64>, b: &mut Array2<f64>) {
    debug_assert_eq!(factors.nrows(), b.nrows());
    for i in (0..taus.len()).rev() {
        if taus[i] != 0.0 {
            let v = factors.slice(s![i.., i]);
            reflector_apply(v, taus[i], b.slice_mut(s![i.., ..]));
        }
    }
}

/// Compute the Q matrix from QR factorization
///
/// Given the packed QR factorization (factors, taus), computes the full
/// `m × m` orthogonal factor.
pub fn compute_q(factors: &Array2<f64>, taus: &Array1<f64>) -> Array2<f64> {
    let mut q = Array2::eye(factors.nrows());
    apply_q(factors, taus, &mut q);
    q
}

/// Compute the R matrix from QR factorization
///
/// Extracts the upper triangular `min(m, n) × n` factor.
pub fn compute_r(factors: &Array2<f64>) -> Array2<f64> {
    let (m, n) = factors.dim();
    let k = m.min(n);

    let mut r = Array2::zeros((k, n));
    for i in 0..k {
        for j in i..n {
            r[[i, j]] = factors[[i, j]];
        }
    }
    r
}
