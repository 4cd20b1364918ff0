//! Least-squares entry point
//!
//! Chains the pipeline `factor -> rank -> solve -> report`:
//! 1. Column-pivoted Householder QR of a private copy of `A`
//! 2. Effective rank from the diagonal of R
//! 3. Back-substitution of `Q^T B` against the leading `rank × rank` block
//! 4. Fitted values and residuals against the original `A`

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::qr::PivotedQr;
use crate::rank::{estimate_rank, Tolerance, ToleranceMode};
use crate::report::FitReport;
use crate::solve::solve_factored;
use crate::workspace::LstsqWorkspace;

/// Configuration for a least-squares solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LstsqConfig {
    /// Rank tolerance
    pub tolerance: Tolerance,
    /// Whether the tolerance is relative to `|R[0,0]|` or absolute
    pub mode: ToleranceMode,
    /// Column pivoting during the factorization (on by default)
    pub use_pivoting: bool,
    /// Reject NaN/Inf in `A` or `B` up front instead of propagating them
    pub check_finite: bool,
}

impl LstsqConfig {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            mode: ToleranceMode::Relative,
            use_pivoting: true,
            check_finite: false,
        }
    }

    /// Validate `tolerance` and build a relative-tolerance configuration
    pub fn relative(tolerance: f64) -> Result<Self, LstsqError> {
        Ok(Self::new(Tolerance::new(tolerance)?))
    }

    /// Validate `tolerance` and build an absolute-tolerance configuration
    pub fn absolute(tolerance: f64) -> Result<Self, LstsqError> {
        Ok(Self::new(Tolerance::new(tolerance)?).with_mode(ToleranceMode::Absolute))
    }

    pub fn with_mode(mut self, mode: ToleranceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pivoting(mut self, use_pivoting: bool) -> Self {
        self.use_pivoting = use_pivoting;
        self
    }

    pub fn with_check_finite(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }
}

impl Default for LstsqConfig {
    fn default() -> Self {
        Self::new(Tolerance::default())
    }
}

/// Error types for least-squares computation
///
/// Only caller errors are reported here; a rank-deficient `A` is a normal
/// outcome reported through [`LstsqResult::rank`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LstsqError {
    #[error("Matrix is empty: {rows} rows, {cols} columns")]
    EmptyMatrix { rows: usize, cols: usize },

    #[error("Row count mismatch: A has {a_rows} rows, B has {b_rows}")]
    DimensionMismatch { a_rows: usize, b_rows: usize },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    #[error("Input contains NaN or infinite values")]
    NonFiniteInput,
}

/// Result of [`solve_least_squares`]
#[derive(Debug, Clone, PartialEq)]
pub struct LstsqResult {
    /// `n × k` coefficients in the original column order. Coefficients of
    /// columns dropped by the rank decision are exactly zero.
    pub coefficients: Array2<f64>,
    /// Effective numerical rank used for the solve
    pub rank: usize,
    /// Column pivot order: position `j` of the factorization holds
    /// column `pivot[j]` of `A`
    pub pivot: Vec<usize>,
    /// `m × k` residuals `B - A X`
    pub residuals: Array2<f64>,
    /// `m × k` fitted values `A X`
    pub fitted: Array2<f64>,
    /// `m × k` effects `Q^T B`
    pub effects: Array2<f64>,
    /// Householder coefficients of the factorization
    pub qraux: Array1<f64>,
}

impl LstsqResult {
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.coefficients.nrows()
    }
}

/// Solve `min ||A X - B||_F` for a possibly rank-deficient `A`
///
/// `A` is `m × n` and `B` is `m × k`. Neither is modified: the factorization
/// runs on a private copy of `A`.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use qrls::{solve_least_squares, LstsqConfig};
///
/// let a = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let b = array![[1.0], [1.0], [3.0]];
/// let result = solve_least_squares(a.view(), b.view(), &LstsqConfig::default()).unwrap();
///
/// assert_eq!(result.rank, 2);
/// assert!((result.coefficients[[0, 0]] - 4.0 / 3.0).abs() < 1e-12);
/// assert!((result.coefficients[[1, 0]] - 4.0 / 3.0).abs() < 1e-12);
/// ```
pub fn solve_least_squares(
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    config: &LstsqConfig,
) -> Result<LstsqResult, LstsqError> {
    validate_inputs(a, b, config)?;
    let qr = PivotedQr::factor(a, config.use_pivoting);
    Ok(finish(a, b, &qr, config))
}

/// Single right-hand-side convenience wrapper around [`solve_least_squares`]
///
/// Returns the coefficient vector, the rank and the pivot order.
pub fn solve_least_squares_vec(
    a: ArrayView2<f64>,
    b: ArrayView1<f64>,
    config: &LstsqConfig,
) -> Result<(Array1<f64>, usize, Vec<usize>), LstsqError> {
    let b2 = b.insert_axis(Axis(1));
    let result = solve_least_squares(a, b2, config)?;
    let x = result.coefficients.index_axis_move(Axis(1), 0);
    Ok((x, result.rank, result.pivot))
}

/// [`solve_least_squares`] factoring `a` in its own storage
///
/// `a` is consumed; the returned [`PivotedQr`] holds the packed factors in
/// the same allocation. Since the original matrix is gone, fitted values and
/// residuals are reconstructed from the factorization.
pub fn solve_least_squares_owned(
    a: Array2<f64>,
    b: ArrayView2<f64>,
    config: &LstsqConfig,
) -> Result<(LstsqResult, PivotedQr), LstsqError> {
    validate_inputs(a.view(), b, config)?;
    let n = a.ncols();
    let qr = PivotedQr::factor_owned(a, config.use_pivoting);

    let rank = decide_rank(&qr, n, config);
    let solution = solve_factored(&qr, rank, b);
    let report = FitReport::from_effects(&qr, solution.effects.view(), rank);

    let result = LstsqResult {
        coefficients: solution.coefficients,
        rank,
        pivot: qr.jpvt.clone(),
        residuals: report.residuals,
        fitted: report.fitted,
        effects: solution.effects,
        qraux: qr.taus.clone(),
    };
    Ok((result, qr))
}

/// [`solve_least_squares`] using caller-owned scratch buffers
///
/// Produces bit-identical output to the allocating version; the workspace
/// only avoids reallocating the factor storage when shapes repeat.
pub fn solve_least_squares_with_workspace(
    workspace: &mut LstsqWorkspace,
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    config: &LstsqConfig,
) -> Result<LstsqResult, LstsqError> {
    validate_inputs(a, b, config)?;
    let qr = workspace.factor(a, config.use_pivoting);
    let result = finish(a, b, qr, config);
    Ok(result)
}

pub(crate) fn validate_inputs(
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    config: &LstsqConfig,
) -> Result<(), LstsqError> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err(LstsqError::EmptyMatrix { rows: m, cols: n });
    }
    if b.nrows() != m {
        return Err(LstsqError::DimensionMismatch {
            a_rows: m,
            b_rows: b.nrows(),
        });
    }
    if b.ncols() == 0 {
        return Err(LstsqError::EmptyMatrix {
            rows: b.nrows(),
            cols: 0,
        });
    }
    if config.check_finite && !(a.iter().all(|v| v.is_finite()) && b.iter().all(|v| v.is_finite()))
    {
        return Err(LstsqError::NonFiniteInput);
    }
    Ok(())
}

fn decide_rank(qr: &PivotedQr, ncols: usize, config: &LstsqConfig) -> usize {
    let rank = estimate_rank(qr.diag(), config.tolerance, config.mode);
    if rank < ncols {
        log::debug!(
            target: "qrls::lstsq",
            "rank deficient: rank {} < {} columns",
            rank,
            ncols
        );
    }
    rank
}

fn finish(
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    qr: &PivotedQr,
    config: &LstsqConfig,
) -> LstsqResult {
    let rank = decide_rank(qr, a.ncols(), config);
    let solution = solve_factored(qr, rank, b);
    let report = FitReport::compute(a, b, solution.coefficients.view());

    LstsqResult {
        coefficients: solution.coefficients,
        rank,
        pivot: qr.jpvt.clone(),
        residuals: report.residuals,
        fitted: report.fitted,
        effects: solution.effects,
        qraux: qr.taus.clone(),
    }
}
