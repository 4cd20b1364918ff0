//! Integration tests for qrls-capi
//!
//! Drives the C entry points the way a C caller would: flat arrays, raw
//! pointers and status codes.

use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2, ShapeBuilder};
use qrls::{validate_qr, PivotedQr};
use qrls_capi::{
    qrls_dqrls, qrls_solve_least_squares, qrls_solve_least_squares_ws, qrls_workspace_clone,
    qrls_workspace_is_assigned, qrls_workspace_new, qrls_workspace_release, QRLS_INTERNAL_ERROR,
    QRLS_INVALID_ARGUMENT, QRLS_INVALID_DIMENSION, QRLS_ORDER_COLUMN_MAJOR, QRLS_ORDER_ROW_MAJOR,
    QRLS_SUCCESS, QRLS_TOL_ABSOLUTE, QRLS_TOL_RELATIVE,
};

// ============================================================================
// Helper Functions
// ============================================================================

struct Output {
    x: Vec<f64>,
    rank: i32,
    pivot: Vec<i32>,
    residuals: Vec<f64>,
}

/// Call `qrls_solve_least_squares` and assert success
fn solve(order: i32, m: usize, n: usize, k: usize, a: &[f64], b: &[f64], tol: f64, mode: i32) -> Output {
    let mut out = Output {
        x: vec![f64::NAN; n * k],
        rank: -1,
        pivot: vec![-1; n],
        residuals: vec![f64::NAN; m * k],
    };
    let status = qrls_solve_least_squares(
        order,
        m as i32,
        n as i32,
        k as i32,
        a.as_ptr(),
        b.as_ptr(),
        tol,
        mode,
        out.x.as_mut_ptr(),
        &mut out.rank,
        out.pivot.as_mut_ptr(),
        out.residuals.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_SUCCESS);
    out
}

// ============================================================================
// qrls_solve_least_squares
// ============================================================================

#[test]
fn test_overdetermined_row_major() {
    // A = [[1,0],[0,1],[1,1]], b = [1,1,3]
    let a = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let b = [1.0, 1.0, 3.0];
    let out = solve(QRLS_ORDER_ROW_MAJOR, 3, 2, 1, &a, &b, 1e-10, QRLS_TOL_RELATIVE);

    assert_eq!(out.rank, 2);
    assert_abs_diff_eq!(out.x[0], 4.0 / 3.0, epsilon = 1e-14);
    assert_abs_diff_eq!(out.x[1], 4.0 / 3.0, epsilon = 1e-14);
    assert_abs_diff_eq!(out.residuals[2], 1.0 / 3.0, epsilon = 1e-14);
}

#[test]
fn test_orders_agree() {
    // 4x2 A, 4x2 B
    let a_rows = [[1.0, 2.0], [3.0, -1.0], [0.5, 0.0], [2.0, 2.0]];
    let b_rows = [[1.0, 0.0], [2.0, 1.0], [0.0, -1.0], [3.0, 2.0]];

    let a_rm: Vec<f64> = a_rows.iter().flatten().copied().collect();
    let b_rm: Vec<f64> = b_rows.iter().flatten().copied().collect();
    let a_cm: Vec<f64> = (0..2).flat_map(|j| a_rows.iter().map(move |r| r[j])).collect();
    let b_cm: Vec<f64> = (0..2).flat_map(|j| b_rows.iter().map(move |r| r[j])).collect();

    let rm = solve(QRLS_ORDER_ROW_MAJOR, 4, 2, 2, &a_rm, &b_rm, 1e-10, QRLS_TOL_RELATIVE);
    let cm = solve(QRLS_ORDER_COLUMN_MAJOR, 4, 2, 2, &a_cm, &b_cm, 1e-10, QRLS_TOL_RELATIVE);

    assert_eq!(rm.rank, cm.rank);
    assert_eq!(rm.pivot, cm.pivot);
    for i in 0..2 {
        for c in 0..2 {
            assert_abs_diff_eq!(rm.x[i * 2 + c], cm.x[c * 2 + i], epsilon = 1e-14);
        }
    }
    for i in 0..4 {
        for c in 0..2 {
            assert_abs_diff_eq!(rm.residuals[i * 2 + c], cm.residuals[c * 4 + i], epsilon = 1e-14);
        }
    }
}

#[test]
fn test_rank_deficient_duplicate_column() {
    // Column-major [[1,1],[2,2],[3,3]]
    let a = [1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
    let b = [1.0, 2.0, 3.0];
    let out = solve(QRLS_ORDER_COLUMN_MAJOR, 3, 2, 1, &a, &b, 1e-10, QRLS_TOL_RELATIVE);

    assert_eq!(out.rank, 1);
    assert_eq!(out.x[out.pivot[1] as usize], 0.0);
    assert!(out.residuals.iter().all(|r| r.abs() < 1e-14));
}

#[test]
fn test_absolute_tolerance_mode() {
    // diag(1e-3, 1e-5), square
    let a = [1e-3, 0.0, 0.0, 1e-5];
    let b = [1.0, 1.0];
    let rel = solve(QRLS_ORDER_ROW_MAJOR, 2, 2, 1, &a, &b, 1e-4, QRLS_TOL_RELATIVE);
    let abs = solve(QRLS_ORDER_ROW_MAJOR, 2, 2, 1, &a, &b, 1e-4, QRLS_TOL_ABSOLUTE);
    assert_eq!(rel.rank, 2);
    assert_eq!(abs.rank, 1);
    assert_eq!(abs.x[1], 0.0);
}

#[test]
fn test_null_residuals_allowed() {
    let a = [2.0, 0.0, 0.0, 4.0];
    let b = [2.0, 2.0];
    let mut x = [0.0; 2];
    let mut rank = 0;
    let mut pivot = [0; 2];
    let status = qrls_solve_least_squares(
        QRLS_ORDER_ROW_MAJOR,
        2,
        2,
        1,
        a.as_ptr(),
        b.as_ptr(),
        1e-10,
        QRLS_TOL_RELATIVE,
        x.as_mut_ptr(),
        &mut rank,
        pivot.as_mut_ptr(),
        std::ptr::null_mut(),
    );
    assert_eq!(status, QRLS_SUCCESS);
    assert_eq!(rank, 2);
    assert_eq!(pivot, [1, 0]);
    assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(x[1], 0.5, epsilon = 1e-15);
}

#[test]
fn test_status_codes() {
    let a = [1.0, 0.0, 0.0, 1.0];
    let b = [1.0, 1.0];
    let mut x = [0.0; 2];
    let mut pivot = [0; 2];

    let call = |order: i32, m: i32, tol: f64, mode: i32, a_ptr: *const f64, x_ptr: *mut f64| {
        let mut rank = 0;
        let mut pivot = [0; 2];
        qrls_solve_least_squares(
            order,
            m,
            2,
            1,
            a_ptr,
            b.as_ptr(),
            tol,
            mode,
            x_ptr,
            &mut rank,
            pivot.as_mut_ptr(),
            std::ptr::null_mut(),
        )
    };

    let x_ptr = x.as_mut_ptr();
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 2, 1e-10, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_SUCCESS);
    assert_eq!(call(5, 2, 1e-10, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_INVALID_ARGUMENT);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 0, 1e-10, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_INVALID_DIMENSION);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, -3, 1e-10, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_INVALID_DIMENSION);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 2, -1.0, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_INVALID_ARGUMENT);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 2, f64::NAN, QRLS_TOL_RELATIVE, a.as_ptr(), x_ptr), QRLS_INVALID_ARGUMENT);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 2, 1e-10, 9, a.as_ptr(), x_ptr), QRLS_INVALID_ARGUMENT);
    assert_eq!(call(QRLS_ORDER_ROW_MAJOR, 2, 1e-10, QRLS_TOL_RELATIVE, std::ptr::null(), x_ptr), QRLS_INVALID_ARGUMENT);
    assert_eq!(
        call(QRLS_ORDER_ROW_MAJOR, 2, 1e-10, QRLS_TOL_RELATIVE, a.as_ptr(), std::ptr::null_mut()),
        QRLS_INVALID_ARGUMENT
    );

    let status = qrls_solve_least_squares(
        QRLS_ORDER_ROW_MAJOR,
        2,
        2,
        1,
        a.as_ptr(),
        b.as_ptr(),
        1e-10,
        QRLS_TOL_RELATIVE,
        x.as_mut_ptr(),
        std::ptr::null_mut(),
        pivot.as_mut_ptr(),
        std::ptr::null_mut(),
    );
    assert_eq!(status, QRLS_INVALID_ARGUMENT);
}

// ============================================================================
// Workspace
// ============================================================================

#[test]
fn test_workspace_lifecycle() {
    let mut status = QRLS_INTERNAL_ERROR;
    let ws = qrls_workspace_new(&mut status);
    assert_eq!(status, QRLS_SUCCESS);
    assert!(!ws.is_null());
    assert_eq!(qrls_workspace_is_assigned(ws), 1);

    let copy = qrls_workspace_clone(ws);
    assert!(!copy.is_null());
    assert_eq!(qrls_workspace_is_assigned(copy), 1);

    qrls_workspace_release(copy);
    qrls_workspace_release(ws);

    assert_eq!(qrls_workspace_is_assigned(std::ptr::null()), 0);
    assert!(qrls_workspace_clone(std::ptr::null()).is_null());
    assert!(qrls_workspace_new(std::ptr::null_mut()).is_null());
    qrls_workspace_release(std::ptr::null_mut());
}

#[test]
fn test_workspace_solve_matches_plain_solve() {
    let mut status = QRLS_INTERNAL_ERROR;
    let ws = qrls_workspace_new(&mut status);
    assert_eq!(status, QRLS_SUCCESS);

    let problems: [(usize, usize, Vec<f64>, Vec<f64>); 3] = [
        (3, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], vec![1.0, 1.0, 3.0]),
        (4, 3, (0..12).map(|i| ((i * 7) % 5) as f64 - 1.5).collect(), vec![1.0, -1.0, 2.0, 0.5]),
        (3, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], vec![1.0, 1.0, 3.0]),
    ];

    for (m, n, a, b) in problems.iter() {
        let (m, n) = (*m, *n);
        let expected = solve(QRLS_ORDER_ROW_MAJOR, m, n, 1, a, b, 1e-10, QRLS_TOL_RELATIVE);

        let mut x = vec![0.0; n];
        let mut rank = -1;
        let mut pivot = vec![-1; n];
        let mut residuals = vec![0.0; m];
        let status = qrls_solve_least_squares_ws(
            ws,
            QRLS_ORDER_ROW_MAJOR,
            m as i32,
            n as i32,
            1,
            a.as_ptr(),
            b.as_ptr(),
            1e-10,
            QRLS_TOL_RELATIVE,
            x.as_mut_ptr(),
            &mut rank,
            pivot.as_mut_ptr(),
            residuals.as_mut_ptr(),
        );
        assert_eq!(status, QRLS_SUCCESS);
        assert_eq!(x, expected.x);
        assert_eq!(rank, expected.rank);
        assert_eq!(pivot, expected.pivot);
        assert_eq!(residuals, expected.residuals);
    }

    let mut x = [0.0; 2];
    let mut rank = 0;
    let mut pivot = [0; 2];
    let status = qrls_solve_least_squares_ws(
        std::ptr::null_mut(),
        QRLS_ORDER_ROW_MAJOR,
        2,
        2,
        1,
        [1.0, 0.0, 0.0, 1.0].as_ptr(),
        [1.0, 1.0].as_ptr(),
        1e-10,
        QRLS_TOL_RELATIVE,
        x.as_mut_ptr(),
        &mut rank,
        pivot.as_mut_ptr(),
        std::ptr::null_mut(),
    );
    assert_eq!(status, QRLS_INVALID_ARGUMENT);

    qrls_workspace_release(ws);
}

// ============================================================================
// qrls_dqrls
// ============================================================================

#[test]
fn test_dqrls_in_place() {
    // Column-major 4x3 design with a duplicated first column
    let c0 = [1.0, 2.0, 3.0, 4.0];
    let c1 = [1.0, -1.0, 1.0, -1.0];
    let mut x: Vec<f64> = c0.iter().chain(c1.iter()).chain(c0.iter()).copied().collect();
    let x_before = x.clone();
    let y: Vec<f64> = (0..4).map(|i| 2.0 * c0[i] + 3.0 * c1[i] + 0.1 * (i as f64)).collect();

    let mut b = vec![f64::NAN; 3];
    let mut rsd = vec![f64::NAN; 4];
    let mut qty = vec![f64::NAN; 4];
    let mut k = -1;
    let mut jpvt = vec![0; 3];
    let mut qraux = vec![f64::NAN; 3];

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        4,
        3,
        y.as_ptr(),
        1,
        1e-7,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_SUCCESS);
    assert_eq!(k, 2);
    assert_eq!(jpvt, vec![1, 2, 3]);
    assert_eq!(b[2], 0.0);
    assert_ne!(x, x_before);

    // R[0,0] carries the norm of the first column
    let norm0 = c0.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert_abs_diff_eq!(x[0].abs(), norm0, epsilon = 1e-12);

    // Same answer as the read-only entry point
    let out = solve(QRLS_ORDER_COLUMN_MAJOR, 4, 3, 1, &x_before, &y, 1e-7, QRLS_TOL_RELATIVE);
    for i in 0..3 {
        assert_abs_diff_eq!(b[i], out.x[i], epsilon = 1e-12);
    }
    for i in 0..4 {
        assert_abs_diff_eq!(rsd[i], out.residuals[i], epsilon = 1e-12);
    }

    // Effects past the rank carry the residual sum of squares
    let rss: f64 = rsd.iter().map(|v| v * v).sum();
    let tail: f64 = qty[2..].iter().map(|v| v * v).sum();
    assert_abs_diff_eq!(rss, tail, epsilon = 1e-12);
    assert!(qraux.iter().all(|v| v.is_finite()));
}

#[test]
fn test_dqrls_outputs_are_lapack_packed() {
    // Column-major 5x3
    let x_before: Vec<f64> = (0..15).map(|i| ((i * 7 % 11) as f64) - 4.0).collect();
    let mut x = x_before.clone();
    let y = vec![1.0, 0.0, -1.0, 2.0, 0.5];
    let mut b = vec![0.0; 3];
    let mut rsd = vec![0.0; 5];
    let mut qty = vec![0.0; 5];
    let mut k = 0;
    let mut jpvt = vec![0; 3];
    let mut qraux = vec![0.0; 3];

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        5,
        3,
        y.as_ptr(),
        1,
        1e-7,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_SUCCESS);

    // Each H_j = I - tau v v^T with v[0] = 1 is orthogonal only for tau in {0} or [1, 2]
    assert!(qraux.iter().all(|&t| t == 0.0 || (1.0..=2.0).contains(&t)));

    // Rebuild the factorization from x, qraux and jpvt and check A P = Q R
    let original = Array2::from_shape_vec((5, 3).f(), x_before).unwrap();
    let qr = PivotedQr {
        factors: Array2::from_shape_vec((5, 3).f(), x).unwrap(),
        taus: Array1::from_vec(qraux),
        jpvt: jpvt.iter().map(|&j| (j - 1) as usize).collect(),
    };
    assert!(validate_qr(original.view(), &qr, 1e-12));
}

#[test]
fn test_dqrls_wide_pads_qraux() {
    // 2x3 column-major
    let mut x = vec![1.0, 0.0, 2.0, 1.0, 3.0, 1.0];
    let y = vec![6.0, 2.0];
    let mut b = vec![0.0; 3];
    let mut rsd = vec![0.0; 2];
    let mut qty = vec![0.0; 2];
    let mut k = 0;
    let mut jpvt = vec![0; 3];
    let mut qraux = vec![f64::NAN; 3];

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        2,
        3,
        y.as_ptr(),
        1,
        1e-7,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_SUCCESS);
    assert_eq!(k, 2);
    assert_eq!(jpvt[0], 3);
    assert_eq!(qraux[2], 0.0);
    assert!(rsd.iter().all(|r| r.abs() < 1e-12));
}

#[test]
fn test_dqrls_rejects_bad_arguments() {
    let mut x = vec![1.0, 0.0, 0.0, 1.0];
    let y = vec![1.0, 1.0];
    let mut b = vec![0.0; 2];
    let mut rsd = vec![0.0; 2];
    let mut qty = vec![0.0; 2];
    let mut k = 0;
    let mut jpvt = vec![0; 2];
    let mut qraux = vec![0.0; 2];

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        2,
        0,
        y.as_ptr(),
        1,
        1e-7,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_INVALID_DIMENSION);

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        2,
        2,
        y.as_ptr(),
        1,
        -1.0,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_INVALID_ARGUMENT);

    let status = qrls_dqrls(
        x.as_mut_ptr(),
        2,
        2,
        std::ptr::null(),
        1,
        1e-7,
        b.as_mut_ptr(),
        rsd.as_mut_ptr(),
        qty.as_mut_ptr(),
        &mut k,
        jpvt.as_mut_ptr(),
        qraux.as_mut_ptr(),
    );
    assert_eq!(status, QRLS_INVALID_ARGUMENT);

    // Nothing was written on failure
    assert_eq!(x, vec![1.0, 0.0, 0.0, 1.0]);
    assert_eq!(k, 0);
}
