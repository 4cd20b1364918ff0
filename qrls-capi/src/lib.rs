//! C API for the qrls least-squares solver
//!
//! Exposes the rank-revealing solver to C, Fortran and anything else that can
//! link a static archive. Matrices are passed as flat arrays together with a
//! memory order flag.

#[macro_use]
mod macros;

mod dqrls;
mod solve;
mod types;
mod utils;

pub use dqrls::*;
pub use solve::*;
pub use types::*;

/// Error codes for the C API
pub type StatusCode = libc::c_int;

pub const QRLS_SUCCESS: StatusCode = 0;
pub const QRLS_INVALID_DIMENSION: StatusCode = -2;
pub const QRLS_INPUT_DIMENSION_MISMATCH: StatusCode = -3;
pub const QRLS_INVALID_ARGUMENT: StatusCode = -6;
pub const QRLS_INTERNAL_ERROR: StatusCode = -7;

// Memory order of matrix arguments
pub const QRLS_ORDER_ROW_MAJOR: libc::c_int = 0;
pub const QRLS_ORDER_COLUMN_MAJOR: libc::c_int = 1;

// Rank tolerance modes
pub const QRLS_TOL_RELATIVE: libc::c_int = 0;
pub const QRLS_TOL_ABSOLUTE: libc::c_int = 1;
