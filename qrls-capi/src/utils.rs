//! Helpers for reading and writing flat C arrays

use ndarray::{ArrayView2, ShapeBuilder};
use qrls::{LstsqConfig, LstsqError, Tolerance, ToleranceMode};

use crate::{
    StatusCode, QRLS_INPUT_DIMENSION_MISMATCH, QRLS_INTERNAL_ERROR, QRLS_INVALID_ARGUMENT,
    QRLS_INVALID_DIMENSION, QRLS_ORDER_COLUMN_MAJOR, QRLS_ORDER_ROW_MAJOR, QRLS_TOL_ABSOLUTE,
    QRLS_TOL_RELATIVE,
};

/// Memory layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOrder {
    RowMajor,    // Rightmost dimension varies fastest (C, Python)
    ColumnMajor, // Leftmost dimension varies fastest (Fortran, Julia, MATLAB)
}

impl MemoryOrder {
    /// Convert from C int to MemoryOrder
    pub fn from_c_int(order: libc::c_int) -> Result<Self, ()> {
        match order {
            QRLS_ORDER_ROW_MAJOR => Ok(Self::RowMajor),
            QRLS_ORDER_COLUMN_MAJOR => Ok(Self::ColumnMajor),
            _ => Err(()),
        }
    }

    /// Flat offset of element `(i, j)` in a `rows × cols` array
    pub fn offset(self, i: usize, j: usize, rows: usize, cols: usize) -> usize {
        match self {
            Self::RowMajor => i * cols + j,
            Self::ColumnMajor => j * rows + i,
        }
    }
}

/// Convert a C dimension to `usize`; zero and negative sizes are rejected
pub fn dim_from_c_int(value: libc::c_int) -> Result<usize, StatusCode> {
    if value <= 0 {
        log::error!(target: "qrls_capi", "invalid dimension {}", value);
        return Err(QRLS_INVALID_DIMENSION);
    }
    Ok(value as usize)
}

/// Number of elements of a `rows × cols` array, guarding against overflow
pub fn element_count(rows: usize, cols: usize) -> Result<usize, StatusCode> {
    rows.checked_mul(cols).ok_or(QRLS_INVALID_DIMENSION)
}

/// Build a solver configuration from the C tolerance arguments
pub fn config_from_c(tol: f64, tol_mode: libc::c_int) -> Result<LstsqConfig, StatusCode> {
    let mode = match tol_mode {
        QRLS_TOL_RELATIVE => ToleranceMode::Relative,
        QRLS_TOL_ABSOLUTE => ToleranceMode::Absolute,
        _ => {
            log::error!(target: "qrls_capi", "unknown tolerance mode {}", tol_mode);
            return Err(QRLS_INVALID_ARGUMENT);
        }
    };
    let tolerance = Tolerance::new(tol).map_err(|e| status_from_error(&e))?;
    Ok(LstsqConfig::new(tolerance).with_mode(mode))
}

/// Map a library error onto a C status code
pub fn status_from_error(err: &LstsqError) -> StatusCode {
    log::error!(target: "qrls_capi", "{}", err);
    match err {
        LstsqError::EmptyMatrix { .. } => QRLS_INVALID_DIMENSION,
        LstsqError::DimensionMismatch { .. } => QRLS_INPUT_DIMENSION_MISMATCH,
        LstsqError::InvalidTolerance(_) | LstsqError::NonFiniteInput => QRLS_INVALID_ARGUMENT,
    }
}

/// Borrow a flat C array as a `rows × cols` matrix
///
/// # Safety
/// `ptr` must point to `rows * cols` readable elements that stay alive and
/// unmodified for `'a`.
pub unsafe fn matrix_view<'a>(
    ptr: *const f64,
    rows: usize,
    cols: usize,
    order: MemoryOrder,
) -> Result<ArrayView2<'a, f64>, StatusCode> {
    let len = element_count(rows, cols)?;
    let data = std::slice::from_raw_parts(ptr, len);
    let view = match order {
        MemoryOrder::RowMajor => ArrayView2::from_shape((rows, cols), data),
        MemoryOrder::ColumnMajor => ArrayView2::from_shape((rows, cols).f(), data),
    };
    view.map_err(|_| QRLS_INTERNAL_ERROR)
}

/// Copy a matrix into a flat C array
///
/// # Safety
/// `out` must have space for `matrix.len()` elements.
pub unsafe fn write_matrix(matrix: ArrayView2<f64>, out: *mut f64, order: MemoryOrder) {
    let (rows, cols) = matrix.dim();
    for ((i, j), &v) in matrix.indexed_iter() {
        *out.add(order.offset(i, j, rows, cols)) = v;
    }
}

/// Copy indices into a C int array, adding `base`
///
/// # Safety
/// `out` must have space for `indices.len()` elements.
pub unsafe fn write_indices(indices: &[usize], out: *mut libc::c_int, base: usize) {
    for (i, &idx) in indices.iter().enumerate() {
        *out.add(i) = (idx + base) as libc::c_int;
    }
}
