//! # qrls: rank-revealing least squares
//!
//! Solves `min ||A X - B||` for dense, possibly rank-deficient `A` using a
//! column-pivoted Householder QR decomposition, in the spirit of LINPACK's
//! `dqrls`.
//!
//! The pipeline is strictly sequential:
//! factorization ([`qr`]) → rank decision ([`rank`]) → triangular solve
//! ([`solve`]) → fitted values and residuals ([`report`]).
//! [`solve_least_squares`] runs all four stages on a private copy of `A`.

pub mod lstsq;
pub mod qr;
pub mod rank;
pub mod report;
pub mod solve;
pub mod utils;
pub mod workspace;

pub use lstsq::{
    solve_least_squares, solve_least_squares_owned, solve_least_squares_vec,
    solve_least_squares_with_workspace,
    LstsqConfig, LstsqError, LstsqResult,
};
pub use qr::{truncate_qr_result, PivotedQr};
pub use rank::{estimate_rank, Tolerance, ToleranceMode, DEFAULT_TOL};
pub use report::FitReport;
pub use solve::{solve_factored, Solution};
pub use utils::{norm_2, norm_frobenius, norm_inf, norm_max, permutation_matrix, validate_qr};
pub use workspace::LstsqWorkspace;

// Re-export ndarray types
pub use ndarray::{Array1, Array2};

// Type aliases for convenience
pub type Matrix = Array2<f64>;
pub type Vector = Array1<f64>;
