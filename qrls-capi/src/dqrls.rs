//! `dqrls`-shaped entry point
//!
//! Takes the argument list of the classic
//! `dqrls(x, n, p, y, ny, tol, b, rsd, qty, k, jpvt, qraux)`: column-major,
//! in place, with a 1-based pivot vector. The rank tolerance is relative.
//!
//! The packed factors are LAPACK-style (`dgeqp3`), not LINPACK-style:
//! Householder vectors have an implicit unit leading entry and `qraux`
//! holds the `tau` coefficients. They cannot be passed on to `dqrsl`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use qrls::{solve_least_squares_owned, LstsqConfig, Tolerance};

use crate::utils::{
    dim_from_c_int, matrix_view, status_from_error, write_indices, write_matrix, MemoryOrder,
};
use crate::{StatusCode, QRLS_INTERNAL_ERROR, QRLS_INVALID_ARGUMENT, QRLS_SUCCESS};

/// Least squares fit with the factors written back into `x`
///
/// # Arguments
/// * `x` - `n × p` design matrix (column-major); overwritten with the packed
///   QR factors: R in the upper triangle, Householder vectors below it
///   without their unit leading entry
/// * `n`, `p` - Dimensions of `x`
/// * `y` - `n × ny` right-hand sides (column-major), read only
/// * `tol` - Relative rank tolerance
/// * `b` - Output `p × ny` coefficients in the original column order;
///   coefficients of dropped columns are exactly 0
/// * `rsd` - Output `n × ny` residuals
/// * `qty` - Output `n × ny` effects `Q^T y`
/// * `k` - Output effective rank
/// * `jpvt` - Output `p` pivot indices (1-based)
/// * `qraux` - Output `p` Householder coefficients `tau`, with
///   `H_j = I - tau_j v_j v_j^T`; entries past `min(n, p)` are 0
///
/// # Returns
/// * `QRLS_SUCCESS` (0) on success
/// * `QRLS_INVALID_DIMENSION` (-2) if `n`, `p` or `ny` is not positive
/// * `QRLS_INVALID_ARGUMENT` (-6) on a NULL pointer or a bad tolerance
/// * `QRLS_INTERNAL_ERROR` (-7) if an internal panic occurs
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub extern "C" fn qrls_dqrls(
    x: *mut f64,
    n: libc::c_int,
    p: libc::c_int,
    y: *const f64,
    ny: libc::c_int,
    tol: f64,
    b: *mut f64,
    rsd: *mut f64,
    qty: *mut f64,
    k: *mut libc::c_int,
    jpvt: *mut libc::c_int,
    qraux: *mut f64,
) -> StatusCode {
    if x.is_null()
        || y.is_null()
        || b.is_null()
        || rsd.is_null()
        || qty.is_null()
        || k.is_null()
        || jpvt.is_null()
        || qraux.is_null()
    {
        return QRLS_INVALID_ARGUMENT;
    }

    let (n, p, ny) = match (dim_from_c_int(n), dim_from_c_int(p), dim_from_c_int(ny)) {
        (Ok(n), Ok(p), Ok(ny)) => (n, p, ny),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return e,
    };
    let config = match Tolerance::new(tol) {
        Ok(t) => LstsqConfig::new(t),
        Err(e) => return status_from_error(&e),
    };

    let order = MemoryOrder::ColumnMajor;
    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        let design = matrix_view(x, n, p, order)?.to_owned();
        let rhs = matrix_view(y, n, ny, order)?;

        let (solved, qr) =
            solve_least_squares_owned(design, rhs, &config).map_err(|e| status_from_error(&e))?;

        write_matrix(qr.factors.view(), x, order);
        write_matrix(solved.coefficients.view(), b, order);
        write_matrix(solved.residuals.view(), rsd, order);
        write_matrix(solved.effects.view(), qty, order);
        *k = solved.rank as libc::c_int;
        write_indices(&solved.pivot, jpvt, 1);
        for j in 0..p {
            *qraux.add(j) = solved.qraux.get(j).copied().unwrap_or(0.0);
        }
        Ok::<_, StatusCode>(())
    }));

    match result {
        Ok(Ok(())) => QRLS_SUCCESS,
        Ok(Err(status)) => status,
        Err(_) => {
            log::error!(target: "qrls_capi", "panic in qrls_dqrls");
            QRLS_INTERNAL_ERROR
        }
    }
}
