mod types;
mod error;

pub use types::*;
use error::{fail, fail_with};

use std::ffi::CString;
use std::os::raw::c_char;

use tg_kernel::{
    multiply, DefaultTiles, GemmError, MatrixTiles, ScalarTiles, TileOp, VectorTiles,
};

/// Execute a closure that returns a `TGStatus`, catching any panics
/// and converting them into `TGStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> TGStatus + std::panic::UnwindSafe>(f: F) -> TGStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => fail_with(TGStatus::ErrorInternal, "internal panic"),
    }
}

fn element_count(operand: &'static str, rows: usize, cols: usize) -> Result<usize, GemmError> {
    rows.checked_mul(cols)
        .ok_or(GemmError::SizeOverflow { operand, rows, cols })
}

/// True if the two element ranges share at least one byte.
fn overlaps(x: *const f32, x_len: usize, y: *const f32, y_len: usize) -> bool {
    if x_len == 0 || y_len == 0 {
        return false;
    }
    let size = std::mem::size_of::<f32>();
    let (x0, y0) = (x as usize, y as usize);
    let x1 = x0.saturating_add(x_len.saturating_mul(size));
    let y1 = y0.saturating_add(y_len.saturating_mul(size));
    x0 < y1 && y0 < x1
}

/// Shared body of every `tg_sgemm*` entry point.
///
/// Zero dimensions return `Ok` before any pointer is looked at, so callers
/// may pass null for empty matrices.
unsafe fn sgemm(
    backend: TGBackendType,
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    catch_panic(|| {
        if n == 0 || m == 0 || k == 0 {
            return TGStatus::Ok;
        }

        let lens = element_count("A", n, m).and_then(|a_len| {
            let b_len = element_count("B", m, k)?;
            let c_len = element_count("C", n, k)?;
            Ok((a_len, b_len, c_len))
        });
        let (a_len, b_len, c_len) = match lens {
            Ok(lens) => lens,
            Err(e) => return fail(e),
        };

        if a.is_null() || b.is_null() || c.is_null() {
            return fail_with(TGStatus::ErrorInvalidArgument, "null matrix pointer");
        }
        if overlaps(c, c_len, a, a_len) {
            return fail(GemmError::AliasedBuffers { operand: "A" });
        }
        if overlaps(c, c_len, b, b_len) {
            return fail(GemmError::AliasedBuffers { operand: "B" });
        }

        // SAFETY: non-null, caller guarantees the documented sizes, and C was
        // checked not to overlap A or B.
        let (a, b, c) = unsafe {
            (
                std::slice::from_raw_parts(a, a_len),
                std::slice::from_raw_parts(b, b_len),
                std::slice::from_raw_parts_mut(c, c_len),
            )
        };

        let result = match backend {
            TGBackendType::Default => multiply::<DefaultTiles>(a, b, c, n, m, k),
            TGBackendType::Scalar => multiply::<ScalarTiles>(a, b, c, n, m, k),
            TGBackendType::Vector => multiply::<VectorTiles>(a, b, c, n, m, k),
            TGBackendType::Matrix => multiply::<MatrixTiles>(a, b, c, n, m, k),
            TGBackendType::Reference => tg_kernel::reference(a, b, c, n, m, k),
        };
        match result {
            Ok(()) => TGStatus::Ok,
            Err(e) => fail(e),
        }
    })
}

/// Compute `C += A · B` with the backend the library was built with.
///
/// All matrices are dense row-major: `a` holds `n*m` floats, `b` holds
/// `m*k`, `c` holds `n*k`. C must not overlap A or B. If any dimension is
/// zero the call is a no-op and the pointers are not read.
///
/// # Safety
/// Non-empty pointers must be valid for the sizes above; `c` must be
/// writable.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(TGBackendType::Default, a, b, c, n, m, k)
}

/// Like `tg_sgemm`, with the backend chosen per call.
///
/// # Safety
/// See `tg_sgemm`.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm_with(
    backend: TGBackendType,
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(backend, a, b, c, n, m, k)
}

/// `tg_sgemm` on the portable scalar backend.
///
/// # Safety
/// See `tg_sgemm`.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm_scalar(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(TGBackendType::Scalar, a, b, c, n, m, k)
}

/// `tg_sgemm` on the short-vector backend.
///
/// # Safety
/// See `tg_sgemm`.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm_vector(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(TGBackendType::Vector, a, b, c, n, m, k)
}

/// `tg_sgemm` on the matrix-register backend.
///
/// # Safety
/// See `tg_sgemm`.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm_matrix(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(TGBackendType::Matrix, a, b, c, n, m, k)
}

/// The triple-loop reference multiply, for validating the tiled paths.
///
/// # Safety
/// See `tg_sgemm`.
#[no_mangle]
pub unsafe extern "C" fn tg_sgemm_reference(
    a: *const f32,
    b: *const f32,
    c: *mut f32,
    n: usize,
    m: usize,
    k: usize,
) -> TGStatus {
    sgemm(TGBackendType::Reference, a, b, c, n, m, k)
}

/// Name of the given backend as a static C string (do not free).
///
/// `TG_BACKEND_TYPE_DEFAULT` reports the backend compiled in as default.
#[no_mangle]
pub extern "C" fn tg_backend_name(backend: TGBackendType) -> *const c_char {
    let name: &'static [u8] = match backend {
        TGBackendType::Default => match DefaultTiles::NAME {
            "vector" => b"vector\0",
            "matrix" => b"matrix\0",
            _ => b"scalar\0",
        },
        TGBackendType::Scalar => b"scalar\0",
        TGBackendType::Vector => b"vector\0",
        TGBackendType::Matrix => b"matrix\0",
        TGBackendType::Reference => b"reference\0",
    };
    name.as_ptr() as *const c_char
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `tg_free_string`.
#[no_mangle]
pub extern "C" fn tg_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `tg_last_error`.
///
/// # Safety
/// `s` must come from `tg_last_error` and not have been freed already.
#[no_mangle]
pub unsafe extern "C" fn tg_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn last_error() -> Option<String> {
        let ptr = tg_last_error();
        if ptr.is_null() {
            return None;
        }
        let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { tg_free_string(ptr as *mut c_char) };
        Some(msg)
    }

    #[test]
    fn test_sgemm_2x2_all_entry_points() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [1.0f32, 2.0, 3.0, 4.0];
        let entry_points: [unsafe extern "C" fn(*const f32, *const f32, *mut f32, usize, usize, usize) -> TGStatus; 5] = [
            tg_sgemm,
            tg_sgemm_scalar,
            tg_sgemm_vector,
            tg_sgemm_matrix,
            tg_sgemm_reference,
        ];
        for f in entry_points {
            let mut c = [0.0f32; 4];
            let status = unsafe { f(a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), 2, 2, 2) };
            assert_eq!(status, TGStatus::Ok);
            assert_eq!(c, [7.0, 10.0, 15.0, 22.0]);
        }
    }

    #[test]
    fn test_sgemm_with_matches_reference() {
        let (n, m, k) = (5, 7, 6);
        let a: Vec<f32> = (0..n * m).map(|v| (v % 13) as f32 * 0.25).collect();
        let b: Vec<f32> = (0..m * k).map(|v| (v % 7) as f32 * 1.5).collect();
        let c0: Vec<f32> = (0..n * k).map(|v| v as f32).collect();

        let mut expected = c0.clone();
        let status = unsafe {
            tg_sgemm_reference(a.as_ptr(), b.as_ptr(), expected.as_mut_ptr(), n, m, k)
        };
        assert_eq!(status, TGStatus::Ok);

        for backend in [TGBackendType::Scalar, TGBackendType::Vector, TGBackendType::Matrix] {
            let mut c = c0.clone();
            let status = unsafe {
                tg_sgemm_with(backend, a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), n, m, k)
            };
            assert_eq!(status, TGStatus::Ok);
            let tol = tg_kernel::tolerance(m);
            for (e, got) in expected.iter().zip(&c) {
                approx::assert_relative_eq!(*e, *got, epsilon = tol, max_relative = tol);
            }
        }
    }

    #[test]
    fn test_zero_dims_accept_null() {
        let status = unsafe {
            tg_sgemm(std::ptr::null(), std::ptr::null(), std::ptr::null_mut(), 0, 4, 4)
        };
        assert_eq!(status, TGStatus::Ok);

        let mut c = [3.0f32; 4];
        let status = unsafe { tg_sgemm(std::ptr::null(), std::ptr::null(), c.as_mut_ptr(), 2, 0, 2) };
        assert_eq!(status, TGStatus::Ok);
        assert_eq!(c, [3.0; 4]);
    }

    #[test]
    fn test_null_pointer_rejected() {
        let a = [1.0f32; 4];
        let mut c = [0.0f32; 4];
        let status = unsafe { tg_sgemm(a.as_ptr(), std::ptr::null(), c.as_mut_ptr(), 2, 2, 2) };
        assert_eq!(status, TGStatus::ErrorInvalidArgument);
        assert_eq!(last_error().as_deref(), Some("null matrix pointer"));
    }

    #[test]
    fn test_aliased_output_rejected() {
        let mut buf = [1.0f32; 8];
        let ptr = buf.as_mut_ptr();
        // C occupies the last four floats, A the middle four: they overlap.
        let status = unsafe { tg_sgemm(ptr.add(2), ptr, ptr.add(4), 2, 2, 2) };
        assert_eq!(status, TGStatus::ErrorAliasedBuffers);
        assert_eq!(buf, [1.0; 8]);
        let msg = last_error().unwrap();
        assert!(msg.contains("overlaps input buffer A"), "{}", msg);
    }

    #[test]
    fn test_adjacent_buffers_are_not_aliased() {
        let mut buf = [1.0f32; 12];
        let ptr = buf.as_mut_ptr();
        let status = unsafe { tg_sgemm(ptr, ptr.add(4), ptr.add(8), 2, 2, 2) };
        assert_eq!(status, TGStatus::Ok);
        assert_eq!(&buf[8..], &[3.0; 4]);
    }

    #[test]
    fn test_size_overflow_rejected() {
        let a = [0.0f32; 1];
        let mut c = [0.0f32; 1];
        let status = unsafe {
            tg_sgemm(a.as_ptr(), a.as_ptr(), c.as_mut_ptr(), usize::MAX, 2, 1)
        };
        assert_eq!(status, TGStatus::ErrorInvalidArgument);
        assert!(last_error().unwrap().contains("overflows"));
    }

    #[test]
    fn test_backend_names() {
        let name = |b| unsafe { CStr::from_ptr(tg_backend_name(b)) }.to_str().unwrap().to_string();
        assert_eq!(name(TGBackendType::Scalar), "scalar");
        assert_eq!(name(TGBackendType::Vector), "vector");
        assert_eq!(name(TGBackendType::Matrix), "matrix");
        assert_eq!(name(TGBackendType::Reference), "reference");
        assert_eq!(name(TGBackendType::Default), DefaultTiles::NAME);
    }

    #[test]
    fn test_no_error_after_success() {
        let _ = last_error();
        let a = [1.0f32];
        let mut c = [0.0f32];
        let status = unsafe { tg_sgemm(a.as_ptr(), a.as_ptr(), c.as_mut_ptr(), 1, 1, 1) };
        assert_eq!(status, TGStatus::Ok);
        assert!(last_error().is_none());
    }
}
