//! Reusable scratch storage for repeated solves
//!
//! A workspace is owned by the caller and passed explicitly by `&mut` to
//! each call. Nothing is shared between workspaces, so separate threads just
//! use separate workspaces.

use ndarray::{Array1, Array2, ArrayView2};

use crate::qr::pivoted::{factor_in_place, ColumnNorms};
use crate::qr::PivotedQr;

/// Caller-owned buffers for the factorization step
#[derive(Debug, Clone)]
pub struct LstsqWorkspace {
    qr: PivotedQr,
    norms: ColumnNorms,
}

impl LstsqWorkspace {
    /// Create an empty workspace; buffers are sized on first use
    pub fn new() -> Self {
        Self {
            qr: PivotedQr {
                factors: Array2::zeros((0, 0)),
                taus: Array1::zeros(0),
                jpvt: Vec::new(),
            },
            norms: ColumnNorms::default(),
        }
    }

    /// Create a workspace pre-sized for `m × n` problems
    pub fn with_shape(m: usize, n: usize) -> Self {
        let mut ws = Self::new();
        ws.reserve(m, n);
        ws
    }

    /// Shape of the factor buffer currently held
    pub fn shape(&self) -> (usize, usize) {
        self.qr.factors.dim()
    }

    /// Factorization left behind by the last call
    pub fn last_factorization(&self) -> &PivotedQr {
        &self.qr
    }

    fn reserve(&mut self, m: usize, n: usize) {
        if self.qr.factors.dim() != (m, n) {
            self.qr.factors = Array2::zeros((m, n));
            self.qr.taus = Array1::zeros(m.min(n));
        }
    }

    /// Copy `a` into the buffers and factor it in place
    pub(crate) fn factor(&mut self, a: ArrayView2<f64>, use_pivoting: bool) -> &PivotedQr {
        let (m, n) = a.dim();
        self.reserve(m, n);
        self.qr.factors.assign(&a);
        factor_in_place(
            &mut self.qr.factors,
            &mut self.qr.taus,
            &mut self.qr.jpvt,
            &mut self.norms,
            use_pivoting,
        );
        &self.qr
    }
}

impl Default for LstsqWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
