/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TGStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorAliasedBuffers = 2,
    ErrorInternal = 3,
}

/// Compute backend type selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TGBackendType {
    /// Whatever backend the library was built with.
    Default = 0,
    Scalar = 1,
    Vector = 2,
    Matrix = 3,
    /// The triple-loop reference multiply.
    Reference = 4,
}

impl From<&tg_kernel::GemmError> for TGStatus {
    fn from(err: &tg_kernel::GemmError) -> Self {
        match err {
            tg_kernel::GemmError::AliasedBuffers { .. } => TGStatus::ErrorAliasedBuffers,
            _ => TGStatus::ErrorInvalidArgument,
        }
    }
}
