//! Least-squares solve API
//!
//! `qrls_solve_least_squares` allocates its scratch space per call;
//! `qrls_solve_least_squares_ws` reuses a caller-owned `qrls_workspace`.
//! Both read `a` and `b` without modifying them.

use std::panic::{catch_unwind, AssertUnwindSafe};

use qrls::{solve_least_squares, solve_least_squares_with_workspace, LstsqResult, LstsqWorkspace};

use crate::types::qrls_workspace;
use crate::utils::{
    config_from_c, dim_from_c_int, matrix_view, status_from_error, write_indices, write_matrix,
    MemoryOrder,
};
use crate::{StatusCode, QRLS_INTERNAL_ERROR, QRLS_INVALID_ARGUMENT, QRLS_SUCCESS};

// Generate common opaque type functions: release, clone, is_assigned
impl_opaque_type_common!(workspace);

/// Create an empty solver workspace
///
/// # Returns
/// * Pointer to the workspace, or NULL on failure. Free it with
///   `qrls_workspace_release`.
#[no_mangle]
pub extern "C" fn qrls_workspace_new(status: *mut StatusCode) -> *mut qrls_workspace {
    if status.is_null() {
        return std::ptr::null_mut();
    }

    let result = catch_unwind(|| Box::into_raw(Box::new(qrls_workspace::new())));

    match result {
        Ok(ptr) => {
            unsafe {
                *status = QRLS_SUCCESS;
            }
            ptr
        }
        Err(_) => {
            unsafe {
                *status = QRLS_INTERNAL_ERROR;
            }
            std::ptr::null_mut()
        }
    }
}

/// Solve `min ||A X - B||` for a possibly rank-deficient `A`
///
/// # Arguments
/// * `order` - Memory order of every matrix argument (`QRLS_ORDER_*`)
/// * `m`, `n`, `k` - `A` is `m × n`, `B` is `m × k`
/// * `a`, `b` - Input matrices, read only
/// * `tol` - Rank tolerance, finite and non-negative
/// * `tol_mode` - `QRLS_TOL_RELATIVE` or `QRLS_TOL_ABSOLUTE`
/// * `x` - Output `n × k` coefficients; dropped columns get exactly 0
/// * `rank` - Output effective rank
/// * `pivot` - Output `n` pivot indices (0-based)
/// * `residuals` - Output `m × k` residuals `B - A X`, may be NULL
///
/// # Returns
/// * `QRLS_SUCCESS` (0) on success
/// * `QRLS_INVALID_DIMENSION` (-2) if a dimension is not positive
/// * `QRLS_INVALID_ARGUMENT` (-6) on a NULL pointer, bad order, bad
///   tolerance or bad tolerance mode
/// * `QRLS_INTERNAL_ERROR` (-7) if an internal panic occurs
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub extern "C" fn qrls_solve_least_squares(
    order: libc::c_int,
    m: libc::c_int,
    n: libc::c_int,
    k: libc::c_int,
    a: *const f64,
    b: *const f64,
    tol: f64,
    tol_mode: libc::c_int,
    x: *mut f64,
    rank: *mut libc::c_int,
    pivot: *mut libc::c_int,
    residuals: *mut f64,
) -> StatusCode {
    solve_impl(
        None, order, m, n, k, a, b, tol, tol_mode, x, rank, pivot, residuals,
    )
}

/// Same as `qrls_solve_least_squares`, reusing the buffers of `ws`
///
/// Results are bit-identical to the allocating version.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub extern "C" fn qrls_solve_least_squares_ws(
    ws: *mut qrls_workspace,
    order: libc::c_int,
    m: libc::c_int,
    n: libc::c_int,
    k: libc::c_int,
    a: *const f64,
    b: *const f64,
    tol: f64,
    tol_mode: libc::c_int,
    x: *mut f64,
    rank: *mut libc::c_int,
    pivot: *mut libc::c_int,
    residuals: *mut f64,
) -> StatusCode {
    if ws.is_null() {
        return QRLS_INVALID_ARGUMENT;
    }
    let workspace = unsafe { &mut (*ws).inner };
    solve_impl(
        Some(workspace),
        order,
        m,
        n,
        k,
        a,
        b,
        tol,
        tol_mode,
        x,
        rank,
        pivot,
        residuals,
    )
}

#[allow(clippy::too_many_arguments)]
fn solve_impl(
    workspace: Option<&mut LstsqWorkspace>,
    order: libc::c_int,
    m: libc::c_int,
    n: libc::c_int,
    k: libc::c_int,
    a: *const f64,
    b: *const f64,
    tol: f64,
    tol_mode: libc::c_int,
    x: *mut f64,
    rank: *mut libc::c_int,
    pivot: *mut libc::c_int,
    residuals: *mut f64,
) -> StatusCode {
    if a.is_null() || b.is_null() || x.is_null() || rank.is_null() || pivot.is_null() {
        return QRLS_INVALID_ARGUMENT;
    }

    let order = match MemoryOrder::from_c_int(order) {
        Ok(o) => o,
        Err(_) => return QRLS_INVALID_ARGUMENT,
    };
    let (m, n, k) = match (dim_from_c_int(m), dim_from_c_int(n), dim_from_c_int(k)) {
        (Ok(m), Ok(n), Ok(k)) => (m, n, k),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return e,
    };
    let config = match config_from_c(tol, tol_mode) {
        Ok(c) => c,
        Err(e) => return e,
    };

    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        let a = matrix_view(a, m, n, order)?;
        let b = matrix_view(b, m, k, order)?;

        let solved = match workspace {
            Some(ws) => solve_least_squares_with_workspace(ws, a, b, &config),
            None => solve_least_squares(a, b, &config),
        };
        let solved = solved.map_err(|e| status_from_error(&e))?;

        write_outputs(&solved, order, x, rank, pivot, residuals);
        Ok::<_, StatusCode>(())
    }));

    match result {
        Ok(Ok(())) => QRLS_SUCCESS,
        Ok(Err(status)) => status,
        Err(_) => {
            log::error!(target: "qrls_capi", "panic in qrls_solve_least_squares");
            QRLS_INTERNAL_ERROR
        }
    }
}

unsafe fn write_outputs(
    solved: &LstsqResult,
    order: MemoryOrder,
    x: *mut f64,
    rank: *mut libc::c_int,
    pivot: *mut libc::c_int,
    residuals: *mut f64,
) {
    write_matrix(solved.coefficients.view(), x, order);
    *rank = solved.rank as libc::c_int;
    write_indices(&solved.pivot, pivot, 0);
    if !residuals.is_null() {
        write_matrix(solved.residuals.view(), residuals, order);
    }
}
