use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GemmError {
    #[error("buffer {operand} too small: need {required} elements, got {actual}")]
    BufferTooSmall {
        operand: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("invalid stride for {operand}: stride {stride} < cols {cols}")]
    InvalidStride {
        operand: &'static str,
        stride: usize,
        cols: usize,
    },
    #[error("gemm dimension mismatch: A [{a_rows}x{a_cols}] @ B [{b_rows}x{b_cols}] -> C [{c_rows}x{c_cols}]")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
        c_rows: usize,
        c_cols: usize,
    },
    #[error("invalid tile size {tile} for backend {backend} (must be 1..={max})")]
    InvalidTileSize {
        tile: usize,
        max: usize,
        backend: &'static str,
    },
    #[error("size of {operand} overflows usize: {rows}x{cols}")]
    SizeOverflow {
        operand: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("output buffer C overlaps input buffer {operand}")]
    AliasedBuffers { operand: &'static str },
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
}

pub type Result<T> = std::result::Result<T, GemmError>;
