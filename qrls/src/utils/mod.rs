//! Utility functions for norms, permutations and result checks

pub mod norms;
pub mod pivoting;
pub mod validation;

pub use norms::{norm_2, norm_frobenius, norm_inf, norm_max};
pub use pivoting::{apply_column_permutation, invert_permutation, permutation_matrix};
pub use validation::validate_qr;
