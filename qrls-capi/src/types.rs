//! Opaque types for the C API

use qrls::LstsqWorkspace;

/// Reusable solver workspace
///
/// Owned by the caller and passed to `qrls_solve_least_squares_ws`. A
/// workspace must not be used from two threads at once; give each thread
/// its own.
#[allow(non_camel_case_types)]
#[derive(Clone)]
#[repr(C)]
pub struct qrls_workspace {
    pub(crate) inner: LstsqWorkspace,
}

impl qrls_workspace {
    pub(crate) fn new() -> Self {
        Self {
            inner: LstsqWorkspace::new(),
        }
    }
}
