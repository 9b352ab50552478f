use std::cell::RefCell;
use std::ffi::CString;

use tg_kernel::GemmError;

use crate::types::TGStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record `msg` for `tg_last_error` and hand back `status` for the caller to return.
pub fn fail_with(status: TGStatus, msg: impl Into<String>) -> TGStatus {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg.into()).ok();
    });
    status
}

/// Map a kernel error to its status code, recording its message.
pub fn fail(err: GemmError) -> TGStatus {
    fail_with(TGStatus::from(&err), err.to_string())
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}
