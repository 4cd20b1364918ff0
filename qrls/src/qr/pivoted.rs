//! Householder QR with column pivoting
//!
//! The factorization always runs over all `min(m, n)` columns; deciding how
//! many of them are numerically independent is left to [`crate::rank`].

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use super::householder::{apply_q, apply_qt, compute_q, compute_r, reflector, reflector_apply};
use crate::utils::norms::norm_2;

/// Result of QR factorization with column pivoting, `A P = Q R`
#[derive(Debug, Clone, PartialEq)]
pub struct PivotedQr {
    /// Packed QR factorization: R in the upper triangle, Householder
    /// vectors (without their unit leading entry) below the diagonal
    pub factors: Array2<f64>,
    /// Householder reflection coefficients, one per reflector
    pub taus: Array1<f64>,
    /// Column pivot indices: column `j` of `A P` is column `jpvt[j]` of `A`
    pub jpvt: Vec<usize>,
}

/// Scratch norms used while choosing pivots
///
/// `partial` holds the norm of rows `j..m` of each remaining column,
/// `initial` the norm of the full column it started as. Both follow the
/// columns through pivot swaps.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnNorms {
    pub(crate) partial: Vec<f64>,
    pub(crate) initial: Vec<f64>,
}

impl PivotedQr {
    /// Factor a private copy of `a`, leaving the caller's matrix untouched
    pub fn factor(a: ArrayView2<f64>, use_pivoting: bool) -> Self {
        Self::factor_owned(a.to_owned(), use_pivoting)
    }

    /// Factor `a` in place, consuming it
    ///
    /// The returned `factors` reuse the allocation of `a`.
    pub fn factor_owned(mut a: Array2<f64>, use_pivoting: bool) -> Self {
        let (m, n) = a.dim();
        let mut taus = Array1::zeros(m.min(n));
        let mut jpvt = Vec::with_capacity(n);
        let mut norms = ColumnNorms::default();
        factor_in_place(&mut a, &mut taus, &mut jpvt, &mut norms, use_pivoting);
        Self {
            factors: a,
            taus,
            jpvt,
        }
    }

    /// Number of rows of the factored matrix
    pub fn nrows(&self) -> usize {
        self.factors.nrows()
    }

    /// Number of columns of the factored matrix
    pub fn ncols(&self) -> usize {
        self.factors.ncols()
    }

    /// Diagonal of R (length `min(m, n)`)
    pub fn diag(&self) -> ArrayView1<'_, f64> {
        self.factors.diag()
    }

    /// Explicit `m × m` orthogonal factor
    pub fn q(&self) -> Array2<f64> {
        compute_q(&self.factors, &self.taus)
    }

    /// Upper triangular `min(m, n) × n` factor
    pub fn r(&self) -> Array2<f64> {
        compute_r(&self.factors)
    }

    /// Overwrite `b` with `Q^T b`
    pub fn apply_qt(&self, b: &mut Array2<f64>) {
        apply_qt(&self.factors, &self.taus, b);
    }

    /// Overwrite `b` with `Q b`
    pub fn apply_q(&self, b: &mut Array2<f64>) {
        apply_q(&self.factors, &self.taus, b);
    }
}

/// Column-pivoted Householder QR of `a`, in place
///
/// On return `a` holds the packed factors, `taus` the reflector coefficients
/// and `jpvt` the pivot order. `taus` must have length `min(m, n)`; `jpvt`
/// and `norms` are resized as needed so that callers may reuse them.
///
/// Pivot choice picks the largest norm over rows `i..m`, with ties going to
/// the lowest index. Partial norms are recomputed from the current trailing
/// block at every step, so exactly tied columns stay tied.
///
/// A column whose remaining part is at most `eps` times its own initial
/// norm is negligible: it gets the identity reflector and a zero diagonal.
pub(crate) fn factor_in_place(
    a: &mut Array2<f64>,
    taus: &mut Array1<f64>,
    jpvt: &mut Vec<usize>,
    norms: &mut ColumnNorms,
    use_pivoting: bool,
) {
    let (m, n) = a.dim();
    let k = m.min(n);
    debug_assert_eq!(taus.len(), k);

    jpvt.clear();
    jpvt.extend(0..n);
    taus.fill(0.0);

    norms.initial.clear();
    norms.initial.extend((0..n).map(|j| norm_2(a.column(j))));
    norms.partial.clear();
    norms.partial.extend_from_slice(&norms.initial);

    for i in 0..k {
        if use_pivoting {
            if i > 0 {
                for j in i..n {
                    norms.partial[j] = norm_2(a.slice(s![i.., j]));
                }
            }

            let mut pvt = i;
            let mut max_val = norms.partial[i];
            for j in (i + 1)..n {
                if norms.partial[j] > max_val {
                    max_val = norms.partial[j];
                    pvt = j;
                }
            }

            if pvt != i {
                jpvt.swap(i, pvt);
                norms.partial.swap(i, pvt);
                norms.initial.swap(i, pvt);
                for row in 0..m {
                    a.swap([row, i], [row, pvt]);
                }
            }
        }

        let threshold = f64::EPSILON * norms.initial[i];
        let (tau_i, _) = reflector(a.slice_mut(s![i.., i]), threshold);
        taus[i] = tau_i;

        if tau_i != 0.0 && i + 1 < n {
            let (col, rest) = a.multi_slice_mut((s![i.., i], s![i.., (i + 1)..]));
            reflector_apply(col.view(), tau_i, rest);
        }
    }

    log::debug!(
        target: "qrls::qr",
        "factored {}x{} matrix, pivots {:?}",
        m,
        n,
        jpvt
    );
}
