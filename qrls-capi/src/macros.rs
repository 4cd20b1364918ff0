//! Lifecycle functions shared by the opaque C API types

/// Generate `qrls_<TYPE>_release`, `qrls_<TYPE>_clone` and
/// `qrls_<TYPE>_is_assigned` for an opaque type `qrls_<TYPE>`
///
/// The type must implement `Clone`. Objects are handed to C as `Box` raw
/// pointers and must be released exactly once.
///
/// # Example
/// ```ignore
/// // In types.rs
/// #[derive(Clone)]
/// #[repr(C)]
/// pub struct qrls_workspace {
///     inner: LstsqWorkspace,
/// }
///
/// // In solve.rs
/// impl_opaque_type_common!(workspace);
/// ```
#[macro_export]
macro_rules! impl_opaque_type_common {
    ($type_name:ident) => {
        paste::paste! {
            /// Release the object by dropping it
            ///
            /// # Safety
            /// The pointer must come from this library and must not be used
            /// after this call. NULL is ignored.
            #[no_mangle]
            pub extern "C" fn [<qrls_ $type_name _release>](obj: *mut [<qrls_ $type_name>]) {
                if obj.is_null() {
                    return;
                }
                unsafe {
                    let _ = Box::from_raw(obj);
                }
            }

            /// Deep copy of the object
            ///
            /// # Returns
            /// A new object to be freed with the matching `_release`, or NULL
            /// if `src` is NULL or the copy panicked.
            #[no_mangle]
            pub extern "C" fn [<qrls_ $type_name _clone>](
                src: *const [<qrls_ $type_name>]
            ) -> *mut [<qrls_ $type_name>] {
                if src.is_null() {
                    return std::ptr::null_mut();
                }

                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| unsafe {
                    let cloned = (*src).clone();
                    Box::into_raw(Box::new(cloned))
                }));

                result.unwrap_or(std::ptr::null_mut())
            }

            /// Check whether the object pointer is non-null
            ///
            /// # Returns
            /// 1 if assigned, 0 otherwise
            #[no_mangle]
            pub extern "C" fn [<qrls_ $type_name _is_assigned>](
                obj: *const [<qrls_ $type_name>]
            ) -> libc::c_int {
                if obj.is_null() {
                    0
                } else {
                    1
                }
            }
        }
    };
}
