//! `tg-kernel` - Tiled single-precision GEMM engine for tile-gemm.
//!
//! This crate provides:
//! - `C += A · B` over arbitrary n/m/k, decomposed into fixed-size output
//!   tiles plus row/column tails (`TileGrid`, `tiled_multiply`)
//! - A per-tile kernel that walks the contraction dimension in tile-sized
//!   chunks, staging B contraction-major (`tile_multiply`, `StagedTile`)
//! - A `TileOp` trait for pluggable tile compute backends, with scalar,
//!   short-vector and matrix-register implementations
//! - Borrowed matrix and tile views (`MatRef`, `MatMut`, `TileView`)
//! - A triple-loop reference multiply used as the correctness oracle

pub mod backend;
pub mod error;
pub mod gemm;
pub mod kernel;
pub mod matrix;
pub mod reference;
pub mod scalar;
pub mod scheduler;
pub mod staging;
pub mod vector;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export primary types at the crate root for convenience.
pub use backend::{BackendKind, DefaultTiles, TileOp};
pub use error::{GemmError, Result};
pub use gemm::{multiply, Gemm, GemmConfig, DEFAULT_TILE};
pub use kernel::tile_multiply;
pub use matrix::MatrixTiles;
pub use reference::{reference, reference_strided, tolerance};
pub use scalar::ScalarTiles;
pub use scheduler::{tiled_multiply, GridTile, ShapeClass, TileGrid};
pub use staging::StagedTile;
pub use vector::VectorTiles;
pub use view::{MatMut, MatRef, TileView, MAX_TILE};
