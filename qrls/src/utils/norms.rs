//! Vector and matrix norm computations

use ndarray::{ArrayView1, ArrayView2};

/// Compute the 2-norm (Euclidean norm) of a vector
///
/// Accumulates with a running scale factor so that columns with entries near
/// `f64::MAX` or `f64::MIN_POSITIVE` do not overflow or underflow.
pub fn norm_2(vec: ArrayView1<f64>) -> f64 {
    scaled_norm(vec.iter())
}

/// Compute the Frobenius norm of a matrix
///
/// Uses the same scaled accumulation as [`norm_2`].
pub fn norm_frobenius(mat: ArrayView2<f64>) -> f64 {
    scaled_norm(mat.iter())
}

fn scaled_norm<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let mut scale = 0.0_f64;
    let mut ssq = 1.0_f64;
    for &val in values {
        if val != 0.0 {
            let absval = val.abs();
            if scale < absval {
                ssq = 1.0 + ssq * (scale / absval) * (scale / absval);
                scale = absval;
            } else {
                ssq += (absval / scale) * (absval / scale);
            }
        } else if val.is_nan() {
            return f64::NAN;
        }
    }
    scale * ssq.sqrt()
}

/// Compute the maximum absolute value in a vector
pub fn norm_inf(vec: ArrayView1<f64>) -> f64 {
    vec.iter().fold(0.0, |acc, &v| acc.max(v.abs()))
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max(mat: ArrayView2<f64>) -> f64 {
    mat.iter().fold(0.0, |acc, &v| acc.max(v.abs()))
}
