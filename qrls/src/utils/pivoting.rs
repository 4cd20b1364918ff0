//! Column pivoting utilities

use ndarray::Array2;

/// Apply column permutation to a matrix
///
/// Column `j` of the result is column `permutation[j]` of the input, so
/// passing the pivot vector of a factorization turns `A` into `A P`.
pub fn apply_column_permutation(matrix: &mut Array2<f64>, permutation: &[usize]) {
    let n = matrix.ncols();
    assert_eq!(permutation.len(), n);

    let original = matrix.clone();
    for (j, &src) in permutation.iter().enumerate() {
        matrix.column_mut(j).assign(&original.column(src));
    }
}

/// Create permutation matrix from permutation vector
///
/// Returns `P` with `P[permutation[j], j] = 1`, i.e. `A.dot(&P)` selects the
/// columns of `A` in pivot order.
pub fn permutation_matrix(permutation: &[usize]) -> Array2<f64> {
    let n = permutation.len();
    let mut p = Array2::zeros((n, n));
    for (j, &src) in permutation.iter().enumerate() {
        p[[src, j]] = 1.0;
    }
    p
}

/// Invert a permutation vector
///
/// Computes `inv` such that `inv[permutation[i]] = i` for all i.
pub fn invert_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; permutation.len()];
    for (i, &p) in permutation.iter().enumerate() {
        inv[p] = i;
    }
    inv
}
